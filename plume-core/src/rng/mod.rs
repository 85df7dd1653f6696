//! Random sources for the race simulation
//!
//! Every stochastic call site (roster generation, pre-race events, in-race
//! incidents, per-tick physics noise) takes a `&mut impl RaceRandom`. In
//! synchronized play that is a [`SeededRandom`] shared by all call sites so
//! every peer draws the exact same sequence. Offline play uses
//! [`SystemRandom`], which has the same output shape but is not reproducible.
//!
//! [`RandomSource`] wraps both so the race can own one concrete type without
//! dynamic dispatch.

pub mod seeded;

pub use seeded::SeededRandom;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draw interface shared by seeded and unseeded sources
pub trait RaceRandom {
    /// Next value in `[0, 1)`
    fn next(&mut self) -> f64;

    /// Uniform float in `[min, max)`
    #[inline]
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        min + (max - min) * self.next()
    }

    /// Uniform integer in `[min, max]` (both bounds inclusive)
    #[inline]
    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        self.next_float(min as f64, (max + 1) as f64).floor() as i64
    }

    /// Uniform index into a collection of `len` elements
    ///
    /// `len` must be non-zero.
    #[inline]
    fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "next_index on empty collection");
        let idx = self.next_int(0, len as i64 - 1);
        (idx.max(0) as usize).min(len - 1)
    }
}

/// Unseeded source backed by the OS entropy pool
#[derive(Debug, Clone)]
pub struct SystemRandom {
    inner: StdRng,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self {
            inner: StdRng::from_entropy(),
        }
    }
}

impl Default for SystemRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceRandom for SystemRandom {
    #[inline]
    fn next(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// The random source owned by one race session
#[derive(Debug, Clone)]
pub enum RandomSource {
    /// Synchronized mode: reproducible LCG stream
    Seeded(SeededRandom),
    /// Offline mode
    System(SystemRandom),
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        RandomSource::Seeded(SeededRandom::new(seed))
    }

    pub fn system() -> Self {
        RandomSource::System(SystemRandom::new())
    }

    /// Current LCG state, `None` in offline mode
    pub fn seed(&self) -> Option<u64> {
        match self {
            RandomSource::Seeded(rng) => Some(rng.seed()),
            RandomSource::System(_) => None,
        }
    }

    pub fn is_seeded(&self) -> bool {
        matches!(self, RandomSource::Seeded(_))
    }
}

impl RaceRandom for RandomSource {
    #[inline]
    fn next(&mut self) -> f64 {
        match self {
            RandomSource::Seeded(rng) => rng.next(),
            RandomSource::System(rng) => rng.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_random_in_unit_interval() {
        let mut rng = SystemRandom::new();
        for _ in 0..1000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_int_inclusive_bounds() {
        let mut rng = RandomSource::seeded(42);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..5000 {
            let v = rng.next_int(0, 6);
            assert!((0..=6).contains(&v));
            seen_min |= v == 0;
            seen_max |= v == 6;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_next_index_stays_in_range() {
        let mut rng = RandomSource::system();
        for len in 1..20 {
            for _ in 0..50 {
                assert!(rng.next_index(len) < len);
            }
        }
    }

    #[test]
    fn test_source_seed_reporting() {
        assert_eq!(RandomSource::seeded(7).seed(), Some(7));
        assert!(RandomSource::system().seed().is_none());
        assert!(!RandomSource::system().is_seeded());
    }
}
