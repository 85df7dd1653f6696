//! Win, place and show
//!
//! | kind  | pays when | multiplier             |
//! |-------|-----------|------------------------|
//! | win   | rank 1    | odds                   |
//! | place | rank ≤ 2  | odds × 0.4             |
//! | show  | rank ≤ 3  | max(odds × 0.3, 1.1)   |

use super::{rank_map, BetOutcome};
use crate::config::constants::{PLACE_ODDS_SHARE, SHOW_MIN_MULTIPLIER, SHOW_ODDS_SHARE};
use crate::core::{BetKind, EntrantId, SettlementError, WagerError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleBet {
    pub entrant: EntrantId,
    pub kind: BetKind,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleResult {
    pub bet: SimpleBet,
    pub rank: u8,
    pub multiplier: Decimal,
    pub outcome: BetOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleSettlement {
    pub results: Vec<SimpleResult>,
    pub total_staked: Decimal,
    pub total_payout: Decimal,
    pub net_profit: Decimal,
}

/// Payout multiplier of a simple bet at the given odds
pub fn multiplier(kind: BetKind, odds: u32) -> Decimal {
    let odds = Decimal::from(odds);
    match kind {
        BetKind::Win => odds,
        BetKind::Place => odds * PLACE_ODDS_SHARE,
        BetKind::Show => (odds * SHOW_ODDS_SHARE).max(SHOW_MIN_MULTIPLIER),
    }
}

/// Simple bets of one race; one line per (entrant, kind)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleBook {
    bets: Vec<SimpleBet>,
}

impl SimpleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stake; a second bet on the same (entrant, kind) accumulates
    pub fn place(&mut self, entrant: EntrantId, amount: Decimal, kind: BetKind) -> Result<(), WagerError> {
        if amount <= Decimal::ZERO {
            return Err(WagerError::NonPositiveStake { amount });
        }
        match self
            .bets
            .iter_mut()
            .find(|b| b.entrant == entrant && b.kind == kind)
        {
            Some(existing) => existing.amount += amount,
            None => self.bets.push(SimpleBet {
                entrant,
                kind,
                amount,
            }),
        }
        Ok(())
    }

    /// Remove one line and return its stake (zero if absent)
    pub fn clear(&mut self, entrant: EntrantId, kind: BetKind) -> Decimal {
        let mut removed = Decimal::ZERO;
        self.bets.retain(|b| {
            if b.entrant == entrant && b.kind == kind {
                removed += b.amount;
                false
            } else {
                true
            }
        });
        removed
    }

    /// Remove every line and return the total stake
    pub fn clear_all(&mut self) -> Decimal {
        let total = self.total_staked();
        self.bets.clear();
        total
    }

    pub fn total_staked(&self) -> Decimal {
        self.bets.iter().map(|b| b.amount).sum()
    }

    pub fn bets(&self) -> &[SimpleBet] {
        &self.bets
    }

    pub fn get(&self, entrant: EntrantId, kind: BetKind) -> Option<&SimpleBet> {
        self.bets.iter().find(|b| b.entrant == entrant && b.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Settle every line against a finish order
    ///
    /// Fails without partial results if the order is malformed or an
    /// entrant holding a bet has no rank or no odds.
    pub fn settle(
        &self,
        order: &[EntrantId],
        odds: &BTreeMap<EntrantId, u32>,
    ) -> Result<SimpleSettlement, SettlementError> {
        let ranks = rank_map(order)?;
        let mut settlement = SimpleSettlement::default();

        for bet in &self.bets {
            let rank = *ranks
                .get(&bet.entrant)
                .ok_or(SettlementError::MissingFromOrder { entrant: bet.entrant })?;
            let entrant_odds = *odds
                .get(&bet.entrant)
                .ok_or(SettlementError::MissingOdds { entrant: bet.entrant })?;

            let multiplier = multiplier(bet.kind, entrant_odds);
            let outcome = BetOutcome::resolve(rank <= bet.kind.paying_rank(), bet.amount, multiplier);

            settlement.total_staked += bet.amount;
            settlement.total_payout += outcome.payout;
            settlement.results.push(SimpleResult {
                bet: *bet,
                rank,
                multiplier,
                outcome,
            });
        }

        settlement.net_profit = settlement.total_payout - settlement.total_staked;
        Ok(settlement)
    }
}
