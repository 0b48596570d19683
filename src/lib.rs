//! An in-memory ordered map from byte strings to byte strings, built on a
//! skiplist so that lookups and insertions take `O(log(n))` on average
//! without any rebalancing.
//!
//! Conceptually, the map resembles something like:
//!
//! ```text
//! [b] ----------------------------------> [f] ---------------->
//! [b] ------------------> [d] ----------> [f] ---------------->
//! [b] --> [c] ----------> [d] --> [e] --> [f] ----------> [h] ->
//! [b] --> [c] --> [c0] -> [d] --> [e] --> [f] --> [g] --> [h] ->
//! ```
//!
//! where level 0 (the bottom row) holds every key in lexicographic order and
//! each level above it holds a random subset of the level beneath, allowing a
//! search to skip ahead before dropping down.
//!
//! Keys are only ever inserted or updated; there is no removal. This makes the
//! map a natural sorted index for write-heavy structures such as a memtable.
//!
//! ```
//! use byteskip::SkipMap;
//!
//! let mut skipmap = SkipMap::new();
//! skipmap.insert("b", "1");
//! skipmap.insert("d", "2");
//! skipmap.insert("a", "3");
//! skipmap.insert("c", "4");
//!
//! assert_eq!(skipmap.find(b"a"), Some(&b"3"[..]));
//! assert_eq!(skipmap.find(b"e"), None);
//! ```
//!
//! The map is single-threaded: it is `Send` but performs no synchronisation of
//! its own, so shared mutation must be guarded by the caller.

pub mod level_generator;
mod skipmap;
mod skipnode;

pub use level_generator::{Geometric, GeometricError, LevelGenerator};
pub use skipmap::SkipMap;
