//! Forced completion
//!
//! Guarantees that every race ends inside its length with at least four
//! ranked finishers, so every exotic kind can settle. Sweeps run after the
//! physics step, in this order:
//!
//! ```text
//! (a) 3 finished, leading unfinished entrant within 2% of the line
//! (b) clock ≥ 90%, fewer than 4 finished: every unfinished entrant ≥ 95%
//! (c) clock ≥ 95%: leaders ≥ 90% until 4 have finished
//! (d) clock ≥ 100%: everyone left, at race_length + (1 − position) × 1000
//! ```
//!
//! Sweeps (a) to (c) stamp the current clock, capped at the race length;
//! ties are broken later by finish sequence, which follows descending
//! position within one sweep.

use crate::config::constants::REQUIRED_FINISHERS;
use crate::config::ForcedCompletionConfig;
use crate::core::EntrantId;
use crate::entrant::Roster;
use tracing::debug;

/// Unfinished entrants at or beyond `min_position`, furthest first
fn unfinished_from(roster: &Roster, min_position: f64) -> Vec<EntrantId> {
    let mut ids: Vec<(f64, EntrantId)> = roster
        .iter()
        .filter(|e| !e.is_finished() && e.position() >= min_position)
        .map(|e| (e.position(), e.id))
        .collect();
    ids.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    ids.into_iter().map(|(_, id)| id).collect()
}

fn force(roster: &mut Roster, id: EntrantId, finish_time: f64, seq: &mut u32) {
    if let Some(e) = roster.get_mut(id) {
        debug!(entrant = %id, position = e.position(), finish_time, "Forced finish");
        e.mark_finished(finish_time, *seq, true);
        *seq += 1;
    }
}

/// Run every sweep that applies at `clock_ms`; returns the forced entrants
pub(crate) fn force_completion(
    roster: &mut Roster,
    clock_ms: f64,
    race_length_ms: f64,
    cfg: &ForcedCompletionConfig,
    seq: &mut u32,
) -> Vec<EntrantId> {
    let mut forced = Vec::new();
    let stamp = clock_ms.min(race_length_ms);

    // (a)
    if roster.finished_count() == REQUIRED_FINISHERS - 1 {
        if let Some(id) = unfinished_from(roster, 1.0 - cfg.fourth_within).first().copied() {
            force(roster, id, stamp, seq);
            forced.push(id);
        }
    }

    // (b)
    if clock_ms >= cfg.late_clock * race_length_ms && roster.finished_count() < REQUIRED_FINISHERS {
        for id in unfinished_from(roster, cfg.late_progress) {
            force(roster, id, stamp, seq);
            forced.push(id);
        }
    }

    // (c)
    if clock_ms >= cfg.fill_clock * race_length_ms {
        let candidates = unfinished_from(roster, cfg.fill_progress);
        for id in candidates {
            if roster.finished_count() >= REQUIRED_FINISHERS {
                break;
            }
            force(roster, id, stamp, seq);
            forced.push(id);
        }
    }

    // (d)
    if clock_ms >= race_length_ms {
        forced.extend(project_remaining(
            roster,
            race_length_ms,
            cfg.synthetic_time_spread_ms,
            seq,
            true,
        ));
    }

    forced
}

/// Give every unfinished entrant a projected finish time
///
/// With `mark_finished` the entrants are also flagged as forced finishers;
/// otherwise only the time and sequence are stamped so they can be ranked.
pub(crate) fn project_remaining(
    roster: &mut Roster,
    race_length_ms: f64,
    spread_ms: f64,
    seq: &mut u32,
    mark_finished: bool,
) -> Vec<EntrantId> {
    let ids = unfinished_from(roster, f64::NEG_INFINITY);
    for id in &ids {
        if let Some(e) = roster.get_mut(*id) {
            let projected = race_length_ms + (1.0 - e.position()) * spread_ms;
            if mark_finished {
                e.mark_finished(projected, *seq, true);
            } else {
                e.progress.finish_time = Some(projected);
                e.progress.finish_seq = Some(*seq);
            }
            *seq += 1;
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeOfDay;
    use crate::entrant::{Entrant, IDENTITY_POOL};
    use approx::assert_relative_eq;

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

    fn finish(roster: &mut Roster, ordinal: u8, seq: &mut u32) {
        roster
            .get_mut(EntrantId::new(ordinal))
            .unwrap()
            .mark_finished(5000.0, *seq, false);
        *seq += 1;
    }

    #[test]
    fn test_fourth_close_to_line_is_forced() {
        let mut roster = roster_at(&[1.0, 1.0, 1.0, 0.985, 0.97, 0.5, 0.5, 0.5]);
        let mut seq = 0;
        for o in 1..=3 {
            finish(&mut roster, o, &mut seq);
        }
        let forced = force_completion(&mut roster, 6000.0, 10_000.0, &ForcedCompletionConfig::default(), &mut seq);
        assert_eq!(forced, vec![EntrantId::new(4)]);
        assert_eq!(roster.finished_count(), 4);
    }

    #[test]
    fn test_nothing_forced_early() {
        let mut roster = roster_at(&[0.8, 0.7, 0.96, 0.5, 0.5, 0.5, 0.5, 0.5]);
        let mut seq = 0;
        let forced = force_completion(&mut roster, 5000.0, 10_000.0, &ForcedCompletionConfig::default(), &mut seq);
        assert!(forced.is_empty());
    }

    #[test]
    fn test_late_sweep_forces_all_near_the_line() {
        let mut roster = roster_at(&[0.96, 0.97, 0.951, 0.5, 0.94, 0.5, 0.5, 0.5]);
        let mut seq = 0;
        let forced = force_completion(&mut roster, 9000.0, 10_000.0, &ForcedCompletionConfig::default(), &mut seq);
        assert_eq!(forced, vec![EntrantId::new(2), EntrantId::new(1), EntrantId::new(3)]);
    }

    #[test]
    fn test_fill_sweep_stops_at_four() {
        let mut roster = roster_at(&[0.93, 0.92, 0.91, 0.905, 0.901, 0.5, 0.5, 0.5]);
        let mut seq = 0;
        let forced = force_completion(&mut roster, 9500.0, 10_000.0, &ForcedCompletionConfig::default(), &mut seq);
        assert_eq!(forced.len(), 4);
        assert!(!roster.get(EntrantId::new(5)).unwrap().is_finished());
    }

    #[test]
    fn test_time_cap_projects_everyone() {
        let mut roster = roster_at(&[0.8, 0.6, 0.7, 0.5, 0.4, 0.3, 0.2, 0.1]);
        let mut seq = 0;
        force_completion(&mut roster, 10_000.0, 10_000.0, &ForcedCompletionConfig::default(), &mut seq);
        assert_eq!(roster.finished_count(), 8);
        let t = roster.get(EntrantId::new(2)).unwrap().progress.finish_time.unwrap();
        assert_relative_eq!(t, 10_400.0, epsilon = 1e-9);

        let order = roster.assign_finish_positions();
        assert_eq!(order[0], EntrantId::new(1));
        assert_eq!(order[7], EntrantId::new(8));
    }
}
