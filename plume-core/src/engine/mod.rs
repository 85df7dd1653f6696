//! Bot engine
//!
//! - `generic`: [`Engine<S, C>`] running complete races for one strategy over one clock
//! - `clock`: time sources the engine ticks against
//! - `stats`: bot-side bookkeeping of bets, results and recommendation accuracy
//! - `announce`: bounded waits on external announcements
//!
//! Strategies are resolved at compile time; the engine is generic over
//! both the strategy and the clock.

pub mod announce;
pub mod clock;
pub mod generic;
pub mod stats;

pub use announce::{await_announcement, AnnouncementOutcome};
pub use clock::{Clock, SimulatedClock, SystemClock};
pub use generic::{Engine, EngineStats, RaceOutcome};
pub use stats::{AccuracyRecord, BotStats, EntrantStats, KindStats};

use crate::core::{AnyBetKind, BetKind, EntrantId, ExoticKind, TimeOfDay};
use crate::events::PreRaceKind;
use crate::race::RaceWaiting;
use rust_decimal::Decimal;

/// Betting strategy
pub trait Strategy {
    /// Bets to place on a waiting race, in placement order
    fn plan(&mut self, card: &RaceCard) -> Vec<BetIntent>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Entrants the strategy was advised to back for the last planned race
    fn recommendations(&self) -> &[EntrantId] {
        &[]
    }

    /// Reset strategy state
    fn reset(&mut self) {}
}

/// One bet a strategy wants placed; the stake is the engine's
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetIntent {
    Simple { entrant: EntrantId, kind: BetKind },
    Exotic { kind: ExoticKind, picks: Vec<EntrantId> },
}

impl BetIntent {
    pub fn kind(&self) -> AnyBetKind {
        match self {
            BetIntent::Simple { kind, .. } => (*kind).into(),
            BetIntent::Exotic { kind, .. } => (*kind).into(),
        }
    }
}

/// What a strategy can see of one entrant
#[derive(Debug, Clone, PartialEq)]
pub struct CardEntry {
    pub id: EntrantId,
    pub name: &'static str,
    pub odds: u32,
    pub preferred_time: TimeOfDay,
    pub condition: Option<PreRaceKind>,
}

/// Read-only view of a waiting race handed to strategies
#[derive(Debug, Clone, PartialEq)]
pub struct RaceCard {
    pub time_of_day: Option<TimeOfDay>,
    pub entries: Vec<CardEntry>,
    pub stake: Decimal,
    pub bankroll: Decimal,
}

impl RaceCard {
    pub fn from_race(race: &RaceWaiting, stake: Decimal, bankroll: Decimal) -> Self {
        let entries = race
            .roster()
            .iter()
            .map(|e| CardEntry {
                id: e.id,
                name: e.name(),
                odds: e.odds,
                preferred_time: e.preferred_time,
                condition: race.pre_race_events().get(e.id),
            })
            .collect();
        Self {
            time_of_day: race.roster().time_of_day(),
            entries,
            stake,
            bankroll,
        }
    }

    pub fn get(&self, id: EntrantId) -> Option<&CardEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntrantId> + '_ {
        self.entries.iter().map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::RaceSettings;
    use rust_decimal_macros::dec;

    #[test]
    fn test_card_mirrors_race() {
        let race = RaceWaiting::seeded(RaceSettings::default(), Some(TimeOfDay::Day), 11);
        let card = RaceCard::from_race(&race, dec!(5), dec!(100));
        assert_eq!(card.entries.len(), 8);
        for entrant in race.roster().iter() {
            let entry = card.get(entrant.id).unwrap();
            assert_eq!(entry.odds, entrant.odds);
            assert_eq!(entry.condition, race.pre_race_events().get(entrant.id));
        }
        assert_eq!(card.time_of_day, Some(TimeOfDay::Day));
    }

    #[test]
    fn test_intent_kind() {
        let simple = BetIntent::Simple {
            entrant: EntrantId::new(1),
            kind: BetKind::Place,
        };
        assert_eq!(simple.kind(), AnyBetKind::Simple(BetKind::Place));
        let exotic = BetIntent::Exotic {
            kind: ExoticKind::Quinella,
            picks: vec![EntrantId::new(1), EntrantId::new(2)],
        };
        assert_eq!(exotic.kind(), AnyBetKind::Exotic(ExoticKind::Quinella));
    }
}
