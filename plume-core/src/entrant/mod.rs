//! Entrant model and the eight-entrant roster
//!
//! Construction draw order (one shared stream):
//!
//! ```text
//! 8 × identity index          (without replacement, pool shrinks each draw)
//! per entrant, ordinal order:
//!     base_speed, stamina, consistency, preferred-time index
//! ```
//!
//! Odds are derived from the drawn attributes and the race time-of-day at
//! construction and are not recomputed when pre-race modifiers change the
//! attributes later.

pub mod identity;
pub mod odds;

pub use identity::{EyeStyle, Identity, Livery, IDENTITY_POOL};

use crate::config::constants::*;
use crate::core::{EntrantId, TimeOfDay};
use crate::rng::RaceRandom;
use std::collections::BTreeMap;

/// Mutable per-race state, cleared by [`Entrant::reset`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceProgress {
    /// Fraction of the course covered, 0.0..=1.0
    pub position: f64,
    pub current_speed: f64,
    pub finished: bool,
    /// Race-clock milliseconds at which the entrant finished
    pub finish_time: Option<f64>,
    /// 1-based finishing rank, assigned once the race ends
    pub finish_rank: Option<u8>,
    /// Order in which the finish was recorded; breaks finish-time ties
    pub finish_seq: Option<u32>,
    /// Finish was imposed by forced completion
    pub forced: bool,
}

/// One ostrich in the field
#[derive(Debug, Clone, PartialEq)]
pub struct Entrant {
    pub id: EntrantId,
    pub identity: &'static Identity,
    pub base_speed: f64,
    pub stamina: f64,
    pub consistency: f64,
    pub preferred_time: TimeOfDay,
    pub odds: u32,
    pub progress: RaceProgress,
}

impl Entrant {
    /// Build an entrant and derive its odds for the given race time
    pub fn new(
        id: EntrantId,
        identity: &'static Identity,
        base_speed: f64,
        stamina: f64,
        consistency: f64,
        preferred_time: TimeOfDay,
        time_of_day: Option<TimeOfDay>,
    ) -> Self {
        let rating = odds::base_rating(base_speed, stamina, consistency)
            * odds::affinity(preferred_time, time_of_day);
        Self::with_odds(
            id,
            identity,
            base_speed,
            stamina,
            consistency,
            preferred_time,
            odds::odds_for_rating(rating),
        )
    }

    /// Build an entrant with odds supplied by a peer
    pub fn with_odds(
        id: EntrantId,
        identity: &'static Identity,
        base_speed: f64,
        stamina: f64,
        consistency: f64,
        preferred_time: TimeOfDay,
        odds: u32,
    ) -> Self {
        Self {
            id,
            identity,
            base_speed,
            stamina,
            consistency,
            preferred_time,
            odds,
            progress: RaceProgress {
                current_speed: base_speed,
                ..RaceProgress::default()
            },
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.identity.name
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.progress.position
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.progress.finished
    }

    /// Resilience to incidents: `lerp(1.0, 0.5, clamp((stamina+consistency)/2))`
    pub fn event_severity(&self) -> f64 {
        let t = ((self.stamina + self.consistency) / 2.0).clamp(0.0, 1.0);
        1.0 + (MIN_EVENT_SEVERITY - 1.0) * t
    }

    /// Advance one physics step
    ///
    /// `noise` is the tick's uniform draw, `speed_multiplier` the effective
    /// multiplier of any active incident. Returns true when this step crossed
    /// the finish threshold.
    pub fn advance(&mut self, dt_ms: f64, race_length_ms: f64, noise: f64, speed_multiplier: f64) -> bool {
        if self.progress.finished {
            return false;
        }

        let variation = (noise - 0.5) * (1.0 - self.consistency) * SPEED_NOISE_AMPLITUDE;
        let mut speed = self.base_speed + variation;
        speed *= 1.0 - self.progress.position * (1.0 - self.stamina) * STAMINA_DECAY;
        speed *= speed_multiplier;

        self.progress.current_speed = speed;
        self.progress.position += speed * dt_ms / race_length_ms;

        if self.progress.position >= FINISH_THRESHOLD {
            self.progress.position = 1.0;
            self.progress.finished = true;
            return true;
        }
        false
    }

    /// Shift the position by an incident, keeping it short of the line
    pub fn nudge(&mut self, delta: f64) {
        let max = FINISH_THRESHOLD - 1e-6;
        self.progress.position = (self.progress.position + delta).clamp(0.0, max);
    }

    /// Record a finish
    pub fn mark_finished(&mut self, finish_time: f64, seq: u32, forced: bool) {
        self.progress.position = 1.0;
        self.progress.finished = true;
        self.progress.finish_time = Some(finish_time);
        self.progress.finish_seq = Some(seq);
        self.progress.forced = forced;
    }

    /// Clear race state; attributes and odds are kept
    pub fn reset(&mut self) {
        self.progress = RaceProgress {
            current_speed: self.base_speed,
            ..RaceProgress::default()
        };
    }
}

/// The eight entrants of one race, in ordinal order
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    entrants: Vec<Entrant>,
    time_of_day: Option<TimeOfDay>,
}

impl Roster {
    /// Draw a fresh field
    pub fn initialize<R: RaceRandom>(time_of_day: Option<TimeOfDay>, rng: &mut R) -> Self {
        let mut available: Vec<&'static Identity> = IDENTITY_POOL.iter().collect();
        let mut selected = Vec::with_capacity(FIELD_SIZE);
        for _ in 0..FIELD_SIZE {
            let idx = rng.next_index(available.len());
            selected.push(available.remove(idx));
        }

        let entrants = selected
            .into_iter()
            .enumerate()
            .map(|(i, identity)| {
                let base_speed = rng.next_float(BASE_SPEED_RANGE.0, BASE_SPEED_RANGE.1);
                let stamina = rng.next_float(STAMINA_RANGE.0, STAMINA_RANGE.1);
                let consistency = rng.next_float(CONSISTENCY_RANGE.0, CONSISTENCY_RANGE.1);
                let time_idx = rng.next_index(TimeOfDay::ALL.len());
                Entrant::new(
                    EntrantId::new(i as u8 + 1),
                    identity,
                    base_speed,
                    stamina,
                    consistency,
                    TimeOfDay::ALL[time_idx],
                    time_of_day,
                )
            })
            .collect();

        Self {
            entrants,
            time_of_day,
        }
    }

    /// Wrap already-built entrants; they are sorted into ordinal order
    pub fn from_entrants(mut entrants: Vec<Entrant>, time_of_day: Option<TimeOfDay>) -> Self {
        entrants.sort_by_key(|e| e.id);
        Self {
            entrants,
            time_of_day,
        }
    }

    pub fn time_of_day(&self) -> Option<TimeOfDay> {
        self.time_of_day
    }

    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn get(&self, id: EntrantId) -> Option<&Entrant> {
        self.entrants.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntrantId) -> Option<&mut Entrant> {
        self.entrants.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EntrantId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entrant> {
        self.entrants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entrant> {
        self.entrants.iter_mut()
    }

    pub fn as_slice(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn ids(&self) -> Vec<EntrantId> {
        self.entrants.iter().map(|e| e.id).collect()
    }

    /// Odds of every entrant, keyed by ordinal
    pub fn odds_table(&self) -> BTreeMap<EntrantId, u32> {
        self.entrants.iter().map(|e| (e.id, e.odds)).collect()
    }

    pub fn finished_count(&self) -> usize {
        self.entrants.iter().filter(|e| e.is_finished()).count()
    }

    /// Entrant furthest along; finished entrants lead by finish order
    pub fn leader(&self) -> Option<EntrantId> {
        self.entrants
            .iter()
            .max_by(|a, b| {
                a.position()
                    .total_cmp(&b.position())
                    .then_with(|| {
                        // Earlier finish sequence wins among finishers
                        let sa = a.progress.finish_seq.unwrap_or(u32::MAX);
                        let sb = b.progress.finish_seq.unwrap_or(u32::MAX);
                        sb.cmp(&sa)
                    })
                    .then_with(|| b.id.cmp(&a.id))
            })
            .map(|e| e.id)
    }

    /// Rank every entrant by finish time and return the finish order
    ///
    /// Ties break by finish sequence, then by ordinal. Entrants without a
    /// finish time go last.
    pub fn assign_finish_positions(&mut self) -> Vec<EntrantId> {
        let mut order: Vec<(Option<f64>, Option<u32>, EntrantId)> = self
            .entrants
            .iter()
            .map(|e| (e.progress.finish_time, e.progress.finish_seq, e.id))
            .collect();

        order.sort_by(|a, b| {
            let time = match (a.0, b.0) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            time.then_with(|| {
                a.1.unwrap_or(u32::MAX).cmp(&b.1.unwrap_or(u32::MAX))
            })
            .then_with(|| a.2.cmp(&b.2))
        });

        let finish_order: Vec<EntrantId> = order.into_iter().map(|(_, _, id)| id).collect();
        for (rank, id) in finish_order.iter().enumerate() {
            if let Some(e) = self.get_mut(*id) {
                e.progress.finish_rank = Some(rank as u8 + 1);
            }
        }
        finish_order
    }

    /// Clear race state of every entrant
    pub fn reset_race_state(&mut self) {
        for e in &mut self.entrants {
            e.reset();
        }
    }
}
