//! Skiplists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the keys, and each
//! level `$n > 0$` contains a random subset of the keys on level `$n - 1$`.
//!
//! A freshly inserted key is promoted one level at a time, each promotion
//! being decided by an independent coin flip. With a fair coin, the number of
//! levels a key occupies is `$1 + \text{Geometric}(1/2)$`, giving an expected
//! `$O(\log n)$` levels overall.
//!
//! It is very unlikely that this will need to be changed as the default should
//! suffice, but the source of coin flips is injectable so that structures can
//! be reproduced exactly.

mod geometric;

pub use geometric::{Geometric, GeometricError};

// ////////////////////////////////////////////////////////////////////////////
// Level Generator
// ////////////////////////////////////////////////////////////////////////////

/// Upon the insertion of a new key in the map, the key is replicated to higher
/// levels for as long as the [`LevelGenerator`] keeps asking for promotion.
pub trait LevelGenerator {
    /// The total number of levels (level 0 included) a map may grow to.
    ///
    /// A key is never promoted to level [`total`][LevelGenerator::total] or
    /// beyond.
    #[must_use]
    fn total(&self) -> usize;

    /// Flip the coin for a single promotion.
    ///
    /// Returns `true` if the key should also be inserted one level higher.
    #[must_use]
    fn promote(&mut self) -> bool;
}

/// Replays a fixed sequence of coin flips, then refuses all further
/// promotions.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct Scripted {
    /// The remaining flips, consumed front to back.
    flips: std::collections::VecDeque<bool>,
    /// The total number of levels.
    total: usize,
}

#[cfg(test)]
impl Scripted {
    pub(crate) fn new(flips: impl IntoIterator<Item = bool>) -> Self {
        Scripted {
            flips: flips.into_iter().collect(),
            total: usize::MAX,
        }
    }

    pub(crate) fn with_total(mut self, total: usize) -> Self {
        self.total = total;
        self
    }

    /// Number of flips that have not been consumed yet.
    pub(crate) fn remaining(&self) -> usize {
        self.flips.len()
    }
}

#[cfg(test)]
impl LevelGenerator for Scripted {
    fn total(&self) -> usize {
        self.total
    }

    fn promote(&mut self) -> bool {
        self.flips.pop_front().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{LevelGenerator, Scripted};

    #[test]
    fn scripted_replays_then_stops() {
        let mut generator = Scripted::new([true, false, true]);
        assert_eq!(generator.remaining(), 3);
        assert!(generator.promote());
        assert!(!generator.promote());
        assert!(generator.promote());
        assert_eq!(generator.remaining(), 0);
        for _ in 0..10 {
            assert!(!generator.promote());
        }
    }

    #[test]
    fn scripted_total() {
        assert_eq!(Scripted::new([]).total(), usize::MAX);
        assert_eq!(Scripted::new([]).with_total(3).total(), 3);
    }
}
