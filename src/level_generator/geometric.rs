//! Geometric level generator.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

use crate::level_generator::LevelGenerator;

/// Default number of levels, enough that the cap is never reached in practice.
const DEFAULT_TOTAL: usize = 64;

/// Default promotion probability: a fair coin.
const DEFAULT_P: f64 = 0.5;

#[derive(Error, Debug, PartialEq, Eq)]
/// Errors that can occur when creating a [`Geometric`] level generator.
#[expect(
    clippy::module_name_repetitions,
    reason = "Using 'Error' would be too generic and may cause confusion."
)]
#[non_exhaustive]
pub enum GeometricError {
    /// The maximum number of levels must be non-zero.
    #[error("max must be non-zero.")]
    ZeroMax,
    /// The probability `$p$` must be in the range `$(0, 1)$`.
    #[error("p must be in (0, 1).")]
    InvalidProbability,
}

/// A level generator flipping a biased coin.
///
/// If a key is present at some level `$n$`, then the probability that it is
/// also present at level `$n+1$` is some constant `$p \in (0, 1)$`. The number
/// of levels a key occupies is therefore geometrically distributed, albeit
/// truncated at the maximum number of levels allowed.
#[derive(Debug)]
pub struct Geometric {
    /// The total number of levels that are assumed to exist.
    total: usize,
    /// The probability that a key is promoted to the next level.
    p: f64,
    /// The random number generator.
    rng: SmallRng,
}

impl Geometric {
    /// Create a new geometric level generator with `total` number of levels,
    /// and `p` as the probability that a given key is present in the next
    /// level.
    ///
    /// The generator is seeded from the thread-local RNG.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be at least 1.
    #[inline]
    pub fn new(total: usize, p: f64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::from_rng(&mut rand::rng()),
        })
    }

    /// Create a new geometric level generator whose coin flips are fully
    /// determined by `seed`.
    ///
    /// Two maps built with the same seed and the same insertion sequence have
    /// identical structures.
    ///
    /// # Errors
    ///
    /// Same as [`Geometric::new`].
    #[inline]
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, GeometricError> {
        Self::validate(total, p)?;
        Ok(Geometric {
            total,
            p,
            rng: SmallRng::seed_from_u64(seed),
        })
    }

    /// The probability that a key is promoted to the next level.
    #[inline]
    #[must_use]
    pub fn p(&self) -> f64 {
        self.p
    }

    fn validate(total: usize, p: f64) -> Result<(), GeometricError> {
        if total == 0 {
            return Err(GeometricError::ZeroMax);
        }
        if !(0.0 < p && p < 1.0) {
            return Err(GeometricError::InvalidProbability);
        }
        Ok(())
    }
}

impl Default for Geometric {
    #[inline]
    fn default() -> Self {
        Geometric {
            total: DEFAULT_TOTAL,
            p: DEFAULT_P,
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }
}

impl LevelGenerator for Geometric {
    #[inline]
    fn total(&self) -> usize {
        self.total
    }

    #[inline]
    fn promote(&mut self) -> bool {
        self.rng.random_bool(self.p)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::{Geometric, GeometricError, LevelGenerator};

    #[test]
    fn invalid_max() {
        assert_eq!(Geometric::new(0, 0.5).err(), Some(GeometricError::ZeroMax));
        assert_eq!(
            Geometric::with_seed(0, 0.5, 1).err(),
            Some(GeometricError::ZeroMax)
        );
    }

    #[rstest]
    fn invalid_p(#[values(0.0, 1.0, -0.5, 1.5, f64::NAN)] p: f64) {
        assert_eq!(
            Geometric::new(1, p).err(),
            Some(GeometricError::InvalidProbability)
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(GeometricError::ZeroMax.to_string(), "max must be non-zero.");
        assert_eq!(
            GeometricError::InvalidProbability.to_string(),
            "p must be in (0, 1)."
        );
    }

    #[test]
    fn default() {
        let generator = Geometric::default();
        assert_eq!(generator.total(), 64);
        assert!((generator.p() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn seeded_is_reproducible() -> Result<()> {
        let mut a = Geometric::with_seed(16, 0.5, 0x1234_abcd)?;
        let mut b = Geometric::with_seed(16, 0.5, 0x1234_abcd)?;
        for _ in 0..1_000 {
            assert_eq!(a.promote(), b.promote());
        }
        Ok(())
    }

    #[rstest]
    fn promotion_rate(
        #[values(1, 16, 1024)] total: usize,
        #[values(0.1, 0.25, 0.5, 0.9)] p: f64,
    ) -> Result<()> {
        const FLIPS: u32 = 100_000;

        let mut generator = Geometric::with_seed(total, p, 42)?;
        assert_eq!(generator.total(), total);

        let promoted = (0..FLIPS).filter(|_| generator.promote()).count();
        let rate = f64::from(u32::try_from(promoted)?) / f64::from(FLIPS);
        // The standard deviation of the rate is at most 0.0016 here.
        assert!((rate - p).abs() < 0.02, "rate {rate} too far from {p}");
        Ok(())
    }
}
