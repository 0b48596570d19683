#[macro_use]
extern crate criterion;

mod skipmap;

criterion_group!(benches, crate::skipmap::benchmark);
criterion_main!(benches);
