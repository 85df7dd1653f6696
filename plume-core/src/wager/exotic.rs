//! Exotic bets
//!
//! | kind       | picks | wins when                 | pays |
//! |------------|-------|---------------------------|------|
//! | exacta     | 2     | picks == top 2, in order  | ×15  |
//! | trifecta   | 3     | picks == top 3, in order  | ×50  |
//! | superfecta | 4     | picks == top 4, in order  | ×200 |
//! | quinella   | 2     | picks == top 2, any order | ×8   |
//!
//! Placing the same (kind, picks) twice adds to the existing bet. For a
//! quinella the picks compare as a set and the first bet's order is kept.

use super::{rank_map, BetOutcome};
use crate::core::{EntrantId, ExoticKind, SettlementError, WagerError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Book-local bet identifier, monotonically increasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetId(pub u64);

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bet-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExoticBet {
    pub id: BetId,
    pub kind: ExoticKind,
    pub picks: Vec<EntrantId>,
    pub amount: Decimal,
}

impl ExoticBet {
    /// Whether the picks name the same outcome
    pub fn matches(&self, kind: ExoticKind, picks: &[EntrantId]) -> bool {
        if self.kind != kind || self.picks.len() != picks.len() {
            return false;
        }
        if kind.is_unordered() {
            picks.iter().all(|p| self.picks.contains(p))
        } else {
            self.picks == picks
        }
    }

    /// Whether the bet wins against a finish order
    pub fn wins(&self, order: &[EntrantId]) -> bool {
        let n = self.kind.pick_count();
        if order.len() < n || self.picks.len() != n {
            return false;
        }
        let top = &order[..n];
        if self.kind.is_unordered() {
            self.picks.iter().all(|p| top.contains(p))
        } else {
            self.picks == top
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExoticResult {
    pub bet: ExoticBet,
    pub outcome: BetOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExoticSettlement {
    pub results: Vec<ExoticResult>,
    pub total_staked: Decimal,
    pub total_payout: Decimal,
    pub net_profit: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExoticBook {
    bets: Vec<ExoticBet>,
    next_id: u64,
}

impl ExoticBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a bet without placing it
    pub fn check(kind: ExoticKind, picks: &[EntrantId], amount: Decimal) -> Result<(), WagerError> {
        if amount <= Decimal::ZERO {
            return Err(WagerError::NonPositiveStake { amount });
        }
        let expected = kind.pick_count();
        if picks.len() != expected {
            return Err(WagerError::WrongPickCount {
                kind,
                expected,
                got: picks.len(),
            });
        }
        for (i, pick) in picks.iter().enumerate() {
            if picks[..i].contains(pick) {
                return Err(WagerError::DuplicatePick { entrant: *pick });
            }
        }
        Ok(())
    }

    /// Place or top up a bet; returns the id of the bet holding the stake
    pub fn place(
        &mut self,
        kind: ExoticKind,
        picks: &[EntrantId],
        amount: Decimal,
    ) -> Result<BetId, WagerError> {
        Self::check(kind, picks, amount)?;

        if let Some(existing) = self.bets.iter_mut().find(|b| b.matches(kind, picks)) {
            existing.amount += amount;
            return Ok(existing.id);
        }

        self.next_id += 1;
        let id = BetId(self.next_id);
        self.bets.push(ExoticBet {
            id,
            kind,
            picks: picks.to_vec(),
            amount,
        });
        Ok(id)
    }

    /// Remove a bet and return its stake
    pub fn clear(&mut self, id: BetId) -> Option<Decimal> {
        let idx = self.bets.iter().position(|b| b.id == id)?;
        Some(self.bets.remove(idx).amount)
    }

    /// Remove every bet and return the total stake
    ///
    /// Ids keep increasing across clears.
    pub fn clear_all(&mut self) -> Decimal {
        let total = self.total_staked();
        self.bets.clear();
        total
    }

    pub fn total_staked(&self) -> Decimal {
        self.bets.iter().map(|b| b.amount).sum()
    }

    pub fn bets(&self) -> &[ExoticBet] {
        &self.bets
    }

    pub fn get(&self, id: BetId) -> Option<&ExoticBet> {
        self.bets.iter().find(|b| b.id == id)
    }

    pub fn find(&self, kind: ExoticKind, picks: &[EntrantId]) -> Option<&ExoticBet> {
        self.bets.iter().find(|b| b.matches(kind, picks))
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    /// Settle every bet against a finish order
    pub fn settle(&self, order: &[EntrantId]) -> Result<ExoticSettlement, SettlementError> {
        let ranks = rank_map(order)?;

        let mut settlement = ExoticSettlement::default();
        for bet in &self.bets {
            let required = bet.kind.pick_count();
            if order.len() < required {
                return Err(SettlementError::TooFewFinishers {
                    required,
                    got: order.len(),
                });
            }
            if let Some(entrant) = bet.picks.iter().find(|p| !ranks.contains_key(*p)) {
                return Err(SettlementError::MissingFromOrder { entrant: *entrant });
            }
            let multiplier = Decimal::from(bet.kind.multiplier());
            let outcome = BetOutcome::resolve(bet.wins(order), bet.amount, multiplier);

            settlement.total_staked += bet.amount;
            settlement.total_payout += outcome.payout;
            settlement.results.push(ExoticResult {
                bet: bet.clone(),
                outcome,
            });
        }

        settlement.net_profit = settlement.total_payout - settlement.total_staked;
        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn ids(ns: &[u8]) -> Vec<EntrantId> {
        ns.iter().map(|n| EntrantId::new(*n)).collect()
    }

    fn order() -> Vec<EntrantId> {
        ids(&[3, 1, 4, 2, 5, 6, 7, 8])
    }

    #[test]
    fn test_quinella_consolidates_either_order() {
        let mut book = ExoticBook::new();
        let a = book.place(ExoticKind::Quinella, &ids(&[2, 5]), dec!(100)).unwrap();
        let b = book.place(ExoticKind::Quinella, &ids(&[5, 2]), dec!(40)).unwrap();
        assert_eq!(a, b);
        assert_eq!(book.bets().len(), 1);
        assert_eq!(book.bets()[0].picks, ids(&[2, 5]));
        assert_eq!(book.bets()[0].amount, dec!(140));
    }

    #[test]
    fn test_pick_missing_from_order_is_an_error() {
        let mut book = ExoticBook::new();
        book.place(ExoticKind::Quinella, &ids(&[5, 6]), dec!(10)).unwrap();
        assert_eq!(
            book.settle(&ids(&[1, 2, 3, 4])).unwrap_err(),
            SettlementError::MissingFromOrder { entrant: EntrantId::new(5) }
        );
    }

    #[test]
    fn test_exacta_order_matters_for_consolidation() {
        let mut book = ExoticBook::new();
        let a = book.place(ExoticKind::Exacta, &ids(&[2, 5]), dec!(10)).unwrap();
        let b = book.place(ExoticKind::Exacta, &ids(&[5, 2]), dec!(10)).unwrap();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_quinella_wins_either_order() {
        let mut book = ExoticBook::new();
        book.place(ExoticKind::Quinella, &ids(&[1, 3]), dec!(10)).unwrap();
        let s = book.settle(&order()).unwrap();
        assert_eq!(s.results[0].outcome.payout, dec!(80));
    }

    #[test]
    fn test_trifecta_needs_exact_order() {
        let mut book = ExoticBook::new();
        book.place(ExoticKind::Trifecta, &ids(&[3, 1, 4]), dec!(10)).unwrap();
        book.place(ExoticKind::Trifecta, &ids(&[1, 3, 4]), dec!(10)).unwrap();
        let s = book.settle(&order()).unwrap();
        assert!(s.results[0].outcome.won);
        assert_eq!(s.results[0].outcome.payout, dec!(500));
        assert!(!s.results[1].outcome.won);
        assert_eq!(s.net_profit, dec!(480));
    }

    #[test]
    fn test_superfecta_pays_two_hundred() {
        let mut book = ExoticBook::new();
        book.place(ExoticKind::Superfecta, &ids(&[3, 1, 4, 2]), dec!(5)).unwrap();
        let s = book.settle(&order()).unwrap();
        assert_eq!(s.total_payout, dec!(1000));
    }

    #[test]
    fn test_validation() {
        let mut book = ExoticBook::new();
        assert_eq!(
            book.place(ExoticKind::Trifecta, &ids(&[1, 2]), dec!(10)),
            Err(WagerError::WrongPickCount {
                kind: ExoticKind::Trifecta,
                expected: 3,
                got: 2
            })
        );
        assert_eq!(
            book.place(ExoticKind::Exacta, &ids(&[4, 4]), dec!(10)),
            Err(WagerError::DuplicatePick {
                entrant: EntrantId::new(4)
            })
        );
        assert!(book.place(ExoticKind::Exacta, &ids(&[1, 2]), dec!(-1)).is_err());
        assert!(book.is_empty());
    }

    #[test]
    fn test_clear_by_id() {
        let mut book = ExoticBook::new();
        let a = book.place(ExoticKind::Exacta, &ids(&[1, 2]), dec!(10)).unwrap();
        let b = book.place(ExoticKind::Quinella, &ids(&[1, 2]), dec!(15)).unwrap();
        assert_eq!(book.clear(a), Some(dec!(10)));
        assert_eq!(book.clear(a), None);
        assert_eq!(book.total_staked(), dec!(15));
        assert_eq!(book.clear_all(), dec!(15));
        let c = book.place(ExoticKind::Exacta, &ids(&[1, 2]), dec!(1)).unwrap();
        assert!(c > b);
    }

    #[test]
    fn test_settle_rejects_duplicate_order() {
        let book = ExoticBook::new();
        assert!(book.settle(&ids(&[1, 1, 2, 3])).is_err());
    }

    proptest! {
        #[test]
        fn prop_quinella_is_order_independent(
            a in 1u8..=8,
            b in 1u8..=8,
            perm in Just((1u8..=8).collect::<Vec<_>>()).prop_shuffle(),
        ) {
            prop_assume!(a != b);
            let order: Vec<EntrantId> = perm.iter().map(|n| EntrantId::new(*n)).collect();
            let mut ab = ExoticBook::new();
            ab.place(ExoticKind::Quinella, &ids(&[a, b]), dec!(10)).unwrap();
            let mut ba = ExoticBook::new();
            ba.place(ExoticKind::Quinella, &ids(&[b, a]), dec!(10)).unwrap();
            prop_assert_eq!(
                ab.settle(&order).unwrap().total_payout,
                ba.settle(&order).unwrap().total_payout
            );
        }
    }
}
