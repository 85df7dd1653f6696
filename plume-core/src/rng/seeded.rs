//! Linear congruential generator used for lock-step multiplayer races
//!
//! `seed = (seed * 9301 + 49297) mod 233280`, output `seed / 233280`.
//!
//! The constants are part of the peer protocol: changing them breaks
//! cross-peer reproducibility.

use super::RaceRandom;
use serde::{Deserialize, Serialize};

pub const LCG_MULTIPLIER: u64 = 9301;
pub const LCG_INCREMENT: u64 = 49297;
pub const LCG_MODULUS: u64 = 233_280;

/// Reproducible random stream
///
/// Two instances built from the same seed yield identical sequences for an
/// identical call sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Seeds larger than the modulus are reduced first; the produced stream
    /// is the same as the unreduced recurrence.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Seed from the wall clock (milliseconds since the epoch)
    pub fn from_clock() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(1);
        Self::new(millis)
    }

    /// Current generator state
    ///
    /// Handing this value to another peer lets it continue the exact same
    /// stream from this point.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.state
    }
}

impl RaceRandom for SeededRandom {
    #[inline]
    fn next(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_draw_matches_recurrence() {
        let mut rng = SeededRandom::new(12345);
        let expected_state = (12345 * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        let v = rng.next();
        assert_eq!(rng.seed(), expected_state);
        assert_relative_eq!(v, expected_state as f64 / LCG_MODULUS as f64);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRandom::new(987_654);
        let mut b = SeededRandom::new(987_654);
        for _ in 0..10_000 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_large_seed_reduction_is_transparent() {
        // A clock-sized seed and its reduced form produce the same stream
        let big = 1_700_000_000_123u64;
        let mut a = SeededRandom::new(big);
        let mut b = SeededRandom::new(big % LCG_MODULUS);
        for _ in 0..100 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_continuation_from_reported_seed() {
        let mut host = SeededRandom::new(42);
        for _ in 0..37 {
            host.next();
        }
        let mut joiner = SeededRandom::new(host.seed());
        for _ in 0..100 {
            assert_eq!(host.next().to_bits(), joiner.next().to_bits());
        }
    }

    #[test]
    fn test_output_range() {
        let mut rng = SeededRandom::new(0);
        for _ in 0..LCG_MODULUS {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_next_float_bounds() {
        let mut rng = SeededRandom::new(99);
        for _ in 0..1000 {
            let v = rng.next_float(0.5, 1.3);
            assert!((0.5..1.3).contains(&v));
        }
    }
}
