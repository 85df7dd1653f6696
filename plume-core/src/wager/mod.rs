//! Bet books and settlement
//!
//! Two independent books: [`SimpleBook`] for win/place/show and
//! [`ExoticBook`] for exacta, trifecta, superfecta and quinella. Books only
//! hold stakes; moving money in and out of a bankroll is the session's job.
//!
//! All amounts are `Decimal`. Payout includes the stake, profit does not:
//! a $100 win bet at 4:1 pays $400 for a $300 profit.

pub mod exotic;
pub mod simple;

pub use exotic::{BetId, ExoticBet, ExoticBook, ExoticResult, ExoticSettlement};
pub use simple::{SimpleBet, SimpleBook, SimpleResult, SimpleSettlement};

use crate::core::{EntrantId, SettlementError};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Win/loss of one settled bet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BetOutcome {
    pub won: bool,
    pub payout: Decimal,
    pub profit: Decimal,
}

impl BetOutcome {
    pub(crate) fn resolve(won: bool, amount: Decimal, multiplier: Decimal) -> Self {
        if won {
            let payout = amount * multiplier;
            Self {
                won,
                payout,
                profit: payout - amount,
            }
        } else {
            Self {
                won,
                payout: Decimal::ZERO,
                profit: -amount,
            }
        }
    }
}

/// Map each entrant in a finish order to its 1-based rank
pub(crate) fn rank_map(order: &[EntrantId]) -> Result<HashMap<EntrantId, u8>, SettlementError> {
    let mut ranks = HashMap::with_capacity(order.len());
    for (i, id) in order.iter().enumerate() {
        if ranks.insert(*id, i as u8 + 1).is_some() {
            return Err(SettlementError::DuplicateInOrder { entrant: *id });
        }
    }
    Ok(ranks)
}
