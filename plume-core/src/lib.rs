//! Plume Core - Deterministic Ostrich Racing and Wagering
//!
//! Plume turns eight entrants' attributes plus one stream of random draws
//! into a reproducible finishing order, and settles win/place/show and
//! exotic bets against it. Seeded races replay identically on every peer
//! that starts from the same parameters.
//!
//! ## Draw Order
//! One [`rng::RandomSource`] feeds, in this order:
//! 1. roster identities and attributes
//! 2. pre-race conditions
//! 3. per racing tick: spontaneous incidents, chain reactions, physics noise
//!
//! ## Core Modules
//! - `core`: identifiers, bet kinds and domain errors
//! - `config`: tuned constants and the serde configuration tree
//! - `rng`: seeded LCG and the unseeded system source
//! - `entrant`: roster, identities and odds
//! - `events`: pre-race conditions, incidents and chain reactions
//! - `race`: typestate race lifecycle, frames and notices
//! - `wager`: simple and exotic bet books
//! - `session`: bankroll, player stats and settlement
//! - `sync`: race parameters for joining peers and desync reconciliation
//! - `engine`: strategy trait, bot engine, clocks and bounded waits

pub mod core;
pub mod config;
pub mod rng;
pub mod entrant;
pub mod events;
pub mod race;
pub mod wager;
pub mod session;
pub mod sync;
pub mod engine;
pub mod utils;

pub use core::{
    AnyBetKind, BetKind, EntrantId, ExoticKind, SettlementError, SyncError, TimeOfDay,
    WagerError,
};

pub use config::Config;
pub use entrant::{Entrant, Roster};
pub use race::{Race, RaceFinished, RaceSettings, RaceWaiting};
pub use session::{RaceSettlement, Session, SessionSnapshot};
pub use sync::RaceParameters;
pub use engine::{BetIntent, Engine, EngineStats, RaceCard, Strategy};

// Re-export error types
pub use anyhow::{Result, Error};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::core::{AnyBetKind, BetKind, EntrantId, ExoticKind, TimeOfDay};

    pub use crate::race::{
        CountdownResult, Race, RaceCounting, RaceFinished, RaceRacing, RaceSettings,
        RaceWaiting, TickResult,
    };

    pub use crate::engine::{BetIntent, Clock, Engine, RaceCard, SimulatedClock, Strategy, SystemClock};
    pub use crate::session::Session;
    pub use crate::config::Config;

    pub use crate::{Result, Error};
}
