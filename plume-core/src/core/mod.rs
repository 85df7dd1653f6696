//! Core identifiers, bet kinds and domain errors
//!
//! - `EntrantId`: ordinal of an entrant (and its lane)
//! - `TimeOfDay`: cyclic period used for affinity
//! - `BetKind` / `ExoticKind`: tagged bet kinds with exhaustive matches
//! - `WagerError` / `SettlementError` / `SyncError`: typed failures

pub mod errors;
pub mod types;

pub use errors::{SettlementError, SyncError, WagerError};
pub use types::{AnyBetKind, BetKind, EntrantId, ExoticKind, TimeOfDay};
