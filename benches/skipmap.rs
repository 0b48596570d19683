use byteskip::SkipMap;
use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::prelude::*;

const STEPS: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

fn random_map(rng: &mut StdRng, size: usize) -> SkipMap {
    std::iter::repeat_with(|| (rng.random::<u64>().to_be_bytes(), rng.random::<u64>().to_be_bytes()))
        .take(size)
        .collect()
}

pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for i in STEPS {
        group.bench_function(BenchmarkId::from_parameter(i), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234abcd);
            let mut sm = random_map(&mut rng, i);

            b.iter(|| {
                sm.insert(rng.random::<u64>().to_be_bytes(), rng.random::<u64>().to_be_bytes());
            })
        });
    }
}

pub fn update(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Update");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for i in STEPS {
        group.bench_function(BenchmarkId::from_parameter(i), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234abcd);
            let mut sm: SkipMap = (0..i as u64).map(|k| (k.to_be_bytes(), k.to_be_bytes())).collect();

            b.iter(|| {
                let key = rng.random_range(0..i as u64);
                sm.insert(key.to_be_bytes(), rng.random::<u64>().to_be_bytes());
            })
        });
    }
}

pub fn find(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipMap Find");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for i in STEPS {
        group.bench_function(BenchmarkId::from_parameter(i), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234abcd);
            let sm: SkipMap = (0..i as u64).map(|k| (k.to_be_bytes(), k.to_le_bytes())).collect();
            let keys: Vec<_> = std::iter::repeat_with(|| rng.random_range(0..2 * i as u64).to_be_bytes())
                .take(10)
                .collect();

            b.iter(|| {
                for key in &keys {
                    black_box(sm.find(key));
                }
            })
        });
    }
}

pub fn benchmark(c: &mut Criterion) {
    insert(c);
    update(c);
    find(c);
}
