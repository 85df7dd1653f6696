//! Rating and odds derivation
//!
//! ```text
//! rating = (speed×0.5 + stamina×0.3 + consistency×0.2) × affinity
//! odds   = first bucket whose floor ≤ rating, else 12
//! ```
//!
//! Better rating means shorter odds; the mapping is monotone non-increasing.

use crate::config::constants::*;
use crate::core::TimeOfDay;

/// Multiplier for racing at `race` when the entrant prefers `preferred`
///
/// The opposite-pair check runs before the cyclic distance check.
pub fn affinity(preferred: TimeOfDay, race: Option<TimeOfDay>) -> f64 {
    let Some(race) = race else {
        return AFFINITY_NEUTRAL;
    };

    if preferred == race {
        return AFFINITY_MATCH;
    }

    if preferred.is_opposite(race) {
        return AFFINITY_OPPOSITE;
    }

    match preferred.distance(race) {
        1 => AFFINITY_ONE_STEP,
        2 => AFFINITY_TWO_STEPS,
        _ => AFFINITY_NEUTRAL,
    }
}

/// Weighted attribute average, before affinity
#[inline]
pub fn base_rating(base_speed: f64, stamina: f64, consistency: f64) -> f64 {
    base_speed * SPEED_WEIGHT + stamina * STAMINA_WEIGHT + consistency * CONSISTENCY_WEIGHT
}

/// Payout multiplier for a rating
pub fn odds_for_rating(rating: f64) -> u32 {
    ODDS_BUCKETS
        .iter()
        .find(|(floor, _)| rating >= *floor)
        .map(|(_, odds)| *odds)
        .unwrap_or(LONGSHOT_ODDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_affinity_table() {
        use TimeOfDay::*;
        assert_relative_eq!(affinity(Morning, Some(Morning)), 1.15);
        assert_relative_eq!(affinity(Night, Some(Day)), 0.90);
        assert_relative_eq!(affinity(Afternoon, Some(Night)), 0.90);
        assert_relative_eq!(affinity(Dawn, Some(Morning)), 0.95);
        assert_relative_eq!(affinity(Night, Some(Evening)), 0.95);
        assert_relative_eq!(affinity(Dawn, Some(Day)), 0.98);
        assert_relative_eq!(affinity(Dawn, Some(Afternoon)), 1.0);
        assert_relative_eq!(affinity(Dusk, None), 1.0);
    }

    #[test]
    fn test_bucket_edges() {
        assert_eq!(odds_for_rating(1.2), 2);
        assert_eq!(odds_for_rating(1.1), 2);
        assert_eq!(odds_for_rating(1.05), 3);
        assert_eq!(odds_for_rating(0.9), 4);
        assert_eq!(odds_for_rating(0.85), 5);
        assert_eq!(odds_for_rating(0.75), 6);
        assert_eq!(odds_for_rating(0.65), 8);
        assert_eq!(odds_for_rating(0.55), 10);
        assert_eq!(odds_for_rating(0.49), 12);
    }

    #[test]
    fn test_base_rating() {
        assert_relative_eq!(base_rating(1.0, 1.0, 1.0), 1.0);
        assert_relative_eq!(base_rating(1.3, 0.5, 0.4), 0.88, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_odds_monotone(a in 0.0f64..2.0, b in 0.0f64..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(odds_for_rating(hi) <= odds_for_rating(lo));
        }
    }
}
