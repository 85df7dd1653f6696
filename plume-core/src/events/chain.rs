//! Chain reactions between neighbouring entrants
//!
//! Geometry is expressed in entrant lengths so the outcome does not depend
//! on how a renderer sizes the track:
//!
//! ```text
//! dx = |progress gap| × track_length
//! dy = |lane gap|     × lane_spacing
//! d  = sqrt(dx² + dy²)
//! ```
//!
//! Same-lane neighbours are in reach up to 1.0, adjacent lanes up to 0.5.
//! The two closest candidates in reach are rolled in order at
//! `chain_probability × (0.5 + 0.5 × (1 − d / reach))`; the first success
//! ends the search for that source.

use super::in_race::{EventEngine, IncidentKind};
use crate::config::constants::{CHAIN_CANDIDATES, EVENT_FREE_ZONE};
use crate::config::ChainGeometry;
use crate::core::EntrantId;
use crate::entrant::Roster;
use crate::rng::RaceRandom;

/// An incident spreading from `source` to `entrant`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainReaction {
    pub entrant: EntrantId,
    pub kind: IncidentKind,
    pub source: EntrantId,
}

struct Candidate {
    id: EntrantId,
    distance: f64,
    reach: f64,
}

/// Roll chain reactions for every active, chain-eligible incident
///
/// Sources are visited in ordinal order. The returned reactions are not yet
/// registered with the engine.
pub fn check_chain_reactions<R: RaceRandom>(
    engine: &EventEngine,
    roster: &Roster,
    geometry: &ChainGeometry,
    rng: &mut R,
) -> Vec<ChainReaction> {
    let mut reactions = Vec::new();

    for event in engine.iter() {
        let Some(base_probability) = event.chain_probability() else {
            continue;
        };
        let Some(source) = roster.get(event.entrant) else {
            continue;
        };

        let mut candidates: Vec<Candidate> = roster
            .iter()
            .filter(|other| other.id != source.id)
            .filter(|other| !other.is_finished() && other.position() < EVENT_FREE_ZONE)
            .filter(|other| !engine.has_active(other.id))
            .filter_map(|other| {
                let lane_gap = source.id.lane().abs_diff(other.id.lane());
                let reach = match lane_gap {
                    // Lanes are per entrant, so a gap of 0 does not occur
                    0 => geometry.same_lane_reach,
                    1 => geometry.adjacent_lane_reach,
                    _ => return None,
                };
                let dx = (other.position() - source.position()).abs() * geometry.track_length;
                let dy = lane_gap as f64 * geometry.lane_spacing;
                let distance = (dx * dx + dy * dy).sqrt();
                (distance <= reach).then_some(Candidate {
                    id: other.id,
                    distance,
                    reach,
                })
            })
            .collect();

        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for candidate in candidates.iter().take(CHAIN_CANDIDATES) {
            let closeness = if candidate.reach > 0.0 {
                1.0 - candidate.distance / candidate.reach
            } else {
                1.0
            };
            let probability = base_probability * (0.5 + 0.5 * closeness);
            if rng.next() < probability {
                reactions.push(ChainReaction {
                    entrant: candidate.id,
                    kind: event.kind,
                    source: source.id,
                });
                break;
            }
        }
    }

    reactions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeOfDay;
    use crate::entrant::{Entrant, IDENTITY_POOL};

    struct Scripted(Vec<f64>, usize);

    impl RaceRandom for Scripted {
        fn next(&mut self) -> f64 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    fn roster_at(positions: &[f64]) -> Roster {
        let entrants = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut e = Entrant::new(
                    EntrantId::new(i as u8 + 1),
                    &IDENTITY_POOL[i],
                    1.0,
                    0.7,
                    0.7,
                    TimeOfDay::Day,
                    None,
                );
                e.progress.position = *p;
                e
            })
            .collect();
        Roster::from_entrants(entrants, None)
    }

    fn engine_with(source: u8, kind: IncidentKind) -> EventEngine {
        let mut engine = EventEngine::new();
        engine.start_chained(EntrantId::new(source), kind, EntrantId::new(source), 0.0);
        engine
    }

    #[test]
    fn test_adjacent_neighbour_in_reach() {
        // Lane gap 1 → dy = 0.3; progress gap 0.01 → dx = 0.12
        let roster = roster_at(&[0.50, 0.51, 0.10]);
        let engine = engine_with(1, IncidentKind::Trip);
        let mut rng = Scripted(vec![0.0], 0);

        let reactions = check_chain_reactions(&engine, &roster, &ChainGeometry::default(), &mut rng);
        assert_eq!(
            reactions,
            vec![ChainReaction {
                entrant: EntrantId::new(2),
                kind: IncidentKind::Trip,
                source: EntrantId::new(1),
            }]
        );
        assert_eq!(rng.1, 1);
    }

    #[test]
    fn test_same_lane_reach_never_applies() {
        let geometry = ChainGeometry {
            same_lane_reach: 100.0,
            adjacent_lane_reach: 0.0,
            ..ChainGeometry::default()
        };
        let roster = roster_at(&[0.50; 8]);
        let engine = engine_with(4, IncidentKind::Trip);
        let mut rng = Scripted(vec![0.0], 0);

        assert!(check_chain_reactions(&engine, &roster, &geometry, &mut rng).is_empty());
        assert_eq!(rng.1, 0);
    }

    #[test]
    fn test_two_lanes_apart_is_out_of_reach() {
        let roster = roster_at(&[0.50, 0.90, 0.50]);
        let engine = engine_with(1, IncidentKind::SpinOut);
        let mut rng = Scripted(vec![0.0], 0);
        assert!(check_chain_reactions(&engine, &roster, &ChainGeometry::default(), &mut rng).is_empty());
        assert_eq!(rng.1, 0);
    }

    #[test]
    fn test_burst_never_chains() {
        let roster = roster_at(&[0.50, 0.50]);
        let engine = engine_with(1, IncidentKind::BurstOfSpeed);
        let mut rng = Scripted(vec![0.0], 0);
        assert!(check_chain_reactions(&engine, &roster, &ChainGeometry::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_rolls_at_most_two_closest() {
        // Source in lane 1 (entrant 2) with neighbours in lanes 0 and 2
        let roster = roster_at(&[0.505, 0.50, 0.51]);
        let engine = engine_with(2, IncidentKind::Stumble);
        let mut rng = Scripted(vec![0.99], 0);
        let reactions = check_chain_reactions(&engine, &roster, &ChainGeometry::default(), &mut rng);
        assert!(reactions.is_empty());
        assert_eq!(rng.1, 2);
    }

    #[test]
    fn test_candidates_in_free_zone_are_skipped() {
        let roster = roster_at(&[0.94, 0.951]);
        let engine = engine_with(1, IncidentKind::Trip);
        let mut rng = Scripted(vec![0.0], 0);
        assert!(check_chain_reactions(&engine, &roster, &ChainGeometry::default(), &mut rng).is_empty());
    }
}
