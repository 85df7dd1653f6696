//! Domain-specific error types for wagering and race synchronization
//!
//! Every error is returned before any state is touched: a rejected wager
//! leaves both the book and the bankroll exactly as they were.

use super::types::{EntrantId, ExoticKind};
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a wager is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WagerError {
    /// Stake must be strictly positive
    #[error("Stake must be positive, got {amount}")]
    NonPositiveStake { amount: Decimal },

    /// Exotic bet with the wrong number of picks
    #[error("{kind} needs {expected} picks, got {got}")]
    WrongPickCount {
        kind: ExoticKind,
        expected: usize,
        got: usize,
    },

    /// The same entrant appears twice in the picks
    #[error("Entrant {entrant} picked more than once")]
    DuplicatePick { entrant: EntrantId },

    /// Entrant is not part of the current roster
    #[error("Unknown entrant {entrant}")]
    UnknownEntrant { entrant: EntrantId },

    /// Bankroll cannot cover the stake
    #[error("Insufficient funds: stake {required} exceeds bankroll {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// A bailout was granted for this race; stakes are capped at the minimum bet
    #[error("Stake {amount} exceeds the bailout limit of {limit}")]
    BailoutStakeLimit { amount: Decimal, limit: Decimal },

    /// Bets are only accepted while the race is waiting
    #[error("Betting is closed for this race")]
    BettingClosed,
}

/// Reasons a finish order cannot be settled
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettlementError {
    /// An entrant holding a bet has no rank
    #[error("Finish order is missing entrant {entrant}")]
    MissingFromOrder { entrant: EntrantId },

    /// The finish order lists an entrant twice
    #[error("Entrant {entrant} appears more than once in the finish order")]
    DuplicateInOrder { entrant: EntrantId },

    /// No odds were supplied for a bet's entrant
    #[error("No odds for entrant {entrant}")]
    MissingOdds { entrant: EntrantId },

    /// Exotic bets need at least this many ranked finishers
    #[error("Finish order has {got} entrants, {required} required")]
    TooFewFinishers { required: usize, got: usize },
}

/// Malformed or inconsistent race-parameter packets
#[derive(Debug, Error)]
pub enum SyncError {
    /// Parameters can only be produced by a seeded race
    #[error("Race is not seeded; parameters cannot be shared")]
    Unseeded,

    #[error("Expected {expected} entrants, got {got}")]
    WrongFieldSize { expected: usize, got: usize },

    #[error("Entrant ordinal {ordinal} is out of range")]
    OrdinalOutOfRange { ordinal: u8 },

    #[error("Entrant ordinal {ordinal} appears more than once")]
    DuplicateOrdinal { ordinal: u8 },

    #[error("Unknown entrant identity '{name}'")]
    UnknownIdentity { name: String },

    #[error("Attribute {field} of entrant {ordinal} is not finite")]
    InvalidAttribute { ordinal: u8, field: &'static str },

    #[error("Pre-race event for unknown entrant {ordinal}")]
    UnknownEventEntrant { ordinal: u8 },

    #[error("Malformed race parameters: {0}")]
    Malformed(#[from] serde_json::Error),
}
