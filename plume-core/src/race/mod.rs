//! Race Lifecycle State Machine - Typestate Pattern
//!
//! # State Diagram
//!
//! ```text
//!      WAITING ──start_countdown()──► COUNTING ──3 ticks──► RACING
//!         ▲                                                   │
//!         │                                      4 finished or time cap
//!         │                                                   ▼
//!         └───────────────reset() / next_race()─────────── FINISHED
//! ```
//!
//! `reset()` is available from every state and returns a waiting race
//! with the same roster and the same (already applied) pre-race
//! conditions.
//!
//! **Key invariants:**
//! - Bets can only be taken against a waiting race's roster
//! - Elapsed race time is `now − start`, never a sum of frame deltas
//! - A racing tick draws from the one shared stream in a fixed order:
//!   spontaneous incidents, chain reactions, then one physics draw per
//!   unfinished entrant in ordinal order
//! - A finished race always has eight ranked entrants and at least four
//!   finishers
//!
//! # Usage
//!
//! ```
//! use plume_core::race::*;
//!
//! let race = RaceWaiting::seeded(RaceSettings::default(), None, 42);
//! let mut counting = race.start_countdown();
//! let mut now = 0u64;
//! let mut racing = loop {
//!     match counting.tick(now) {
//!         CountdownResult::Counting(c) => counting = c,
//!         CountdownResult::Started(r) => break r,
//!     }
//! };
//! let finished = loop {
//!     now += 16;
//!     match racing.tick(now) {
//!         TickResult::Running(r) => racing = r,
//!         TickResult::Finished(f) => break f,
//!     }
//! };
//! assert_eq!(finished.finish_order().len(), 8);
//! ```

mod forced;
pub mod frame;
pub mod notice;
pub mod states;

pub use frame::{EntrantFrame, RaceFrame, RacePhase};
pub use notice::{NoticeSink, RaceNotice};
pub use states::{
    CountdownResult, Race, RaceCounting, RaceFinished, RaceRacing, RaceWaiting, TickResult,
};

use crate::config::{ChainGeometry, Config, ForcedCompletionConfig};

/// Tunables of one race
#[derive(Debug, Clone, PartialEq)]
pub struct RaceSettings {
    pub race_length_ms: f64,
    pub countdown_ticks: u32,
    pub notice_capacity: usize,
    pub forced: ForcedCompletionConfig,
    pub chain: ChainGeometry,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for RaceSettings {
    fn from(config: &Config) -> Self {
        Self {
            race_length_ms: config.race.race_length_ms,
            countdown_ticks: config.race.countdown_ticks,
            notice_capacity: config.race.notice_capacity,
            forced: config.forced,
            chain: config.chain,
        }
    }
}
