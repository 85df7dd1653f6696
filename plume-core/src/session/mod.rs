//! Player session: bankroll, stats and the open bet books
//!
//! The session is the only owner of money. Stakes leave the bankroll when a
//! bet is placed, come back when it is cleared, and payouts are credited at
//! settlement. Every rejected wager leaves the session untouched.
//!
//! # Bailouts
//!
//! Before each bet, a player who has watched at least one race and holds
//! less than the minimum bet is topped up to the minimum. For the rest of
//! that race no single stake may exceed the minimum bet.

use crate::config::WagerConfig;
use crate::core::{BetKind, EntrantId, ExoticKind, SettlementError, WagerError};
use crate::race::{RaceFinished, RaceWaiting};
use crate::wager::{BetId, ExoticBook, ExoticSettlement, SimpleBook, SimpleSettlement};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Lifetime player statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub races_watched: u32,
    pub wins: u32,
    pub losses: u32,
    pub biggest_win: Decimal,
    pub biggest_loss: Decimal,
    pub bailouts: u32,
}

impl PlayerStats {
    fn record(&mut self, net_profit: Decimal) {
        self.races_watched += 1;
        if net_profit > Decimal::ZERO {
            self.wins += 1;
            self.biggest_win = self.biggest_win.max(net_profit);
        } else {
            self.losses += 1;
            self.biggest_loss = self.biggest_loss.max(net_profit.abs());
        }
    }
}

/// What an external store keeps between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub bankroll: Decimal,
    #[serde(default)]
    pub stats: PlayerStats,
}

/// Result of settling one race against both books
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceSettlement {
    pub order: Vec<EntrantId>,
    pub simple: SimpleSettlement,
    pub exotic: ExoticSettlement,
    pub total_staked: Decimal,
    pub total_payout: Decimal,
    pub net_profit: Decimal,
    pub bankroll_after: Decimal,
}

#[derive(Debug, Clone)]
pub struct Session {
    bankroll: Decimal,
    stats: PlayerStats,
    simple: SimpleBook,
    exotic: ExoticBook,
    min_bet: Decimal,
    bailout_this_race: bool,
}

impl Session {
    pub fn new(config: &WagerConfig) -> Self {
        Self::from_snapshot(
            SessionSnapshot {
                bankroll: config.starting_bankroll,
                stats: PlayerStats::default(),
            },
            config,
        )
    }

    pub fn from_snapshot(snapshot: SessionSnapshot, config: &WagerConfig) -> Self {
        Self {
            bankroll: snapshot.bankroll.max(Decimal::ZERO),
            stats: snapshot.stats,
            simple: SimpleBook::new(),
            exotic: ExoticBook::new(),
            min_bet: config.min_bet,
            bailout_this_race: false,
        }
    }

    /// Bankroll and stats; open stakes are counted as still in the bankroll
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            bankroll: self.bankroll + self.total_staked(),
            stats: self.stats.clone(),
        }
    }

    pub fn bankroll(&self) -> Decimal {
        self.bankroll
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    pub fn simple_book(&self) -> &SimpleBook {
        &self.simple
    }

    pub fn exotic_book(&self) -> &ExoticBook {
        &self.exotic
    }

    pub fn min_bet(&self) -> Decimal {
        self.min_bet
    }

    pub fn total_staked(&self) -> Decimal {
        self.simple.total_staked() + self.exotic.total_staked()
    }

    pub fn bailout_active(&self) -> bool {
        self.bailout_this_race
    }

    pub fn has_open_bets(&self) -> bool {
        !self.simple.is_empty() || !self.exotic.is_empty()
    }

    // ========================================================================
    // Placing and clearing
    // ========================================================================

    /// Place a win/place/show bet on an entrant of the waiting race
    pub fn place_bet(
        &mut self,
        race: &RaceWaiting,
        entrant: EntrantId,
        amount: Decimal,
        kind: BetKind,
    ) -> Result<(), WagerError> {
        if amount <= Decimal::ZERO {
            return Err(WagerError::NonPositiveStake { amount });
        }
        if !race.roster().contains(entrant) {
            return Err(WagerError::UnknownEntrant { entrant });
        }
        let grant = self.check_funds(amount)?;

        self.apply_bailout(grant);
        self.simple.place(entrant, amount, kind)?;
        self.bankroll -= amount;
        debug!(%entrant, kind = kind.as_str(), %amount, bankroll = %self.bankroll, "Bet placed");
        Ok(())
    }

    /// Place an exotic bet; returns the id of the bet holding the stake
    pub fn place_exotic(
        &mut self,
        race: &RaceWaiting,
        kind: ExoticKind,
        picks: &[EntrantId],
        amount: Decimal,
    ) -> Result<BetId, WagerError> {
        ExoticBook::check(kind, picks, amount)?;
        if let Some(unknown) = picks.iter().find(|p| !race.roster().contains(**p)) {
            return Err(WagerError::UnknownEntrant { entrant: *unknown });
        }
        let grant = self.check_funds(amount)?;

        self.apply_bailout(grant);
        let id = self.exotic.place(kind, picks, amount)?;
        self.bankroll -= amount;
        debug!(%id, kind = kind.as_str(), %amount, bankroll = %self.bankroll, "Exotic bet placed");
        Ok(id)
    }

    /// Remove a simple bet and refund its stake
    pub fn clear_bet(&mut self, entrant: EntrantId, kind: BetKind) -> Decimal {
        let refund = self.simple.clear(entrant, kind);
        self.bankroll += refund;
        refund
    }

    /// Remove an exotic bet and refund its stake
    pub fn clear_exotic(&mut self, id: BetId) -> Option<Decimal> {
        let refund = self.exotic.clear(id)?;
        self.bankroll += refund;
        Some(refund)
    }

    /// Remove every open bet and refund the stakes
    pub fn clear_all(&mut self) -> Decimal {
        let refund = self.simple.clear_all() + self.exotic.clear_all();
        self.bankroll += refund;
        refund
    }

    /// Decide whether this stake is affordable, and whether it needs a bailout first
    fn check_funds(&self, amount: Decimal) -> Result<bool, WagerError> {
        let grant = self.stats.races_watched > 0 && self.bankroll < self.min_bet;
        if (grant || self.bailout_this_race) && amount > self.min_bet {
            return Err(WagerError::BailoutStakeLimit {
                amount,
                limit: self.min_bet,
            });
        }
        let available = if grant { self.min_bet } else { self.bankroll };
        if amount > available {
            return Err(WagerError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        Ok(grant)
    }

    fn apply_bailout(&mut self, grant: bool) {
        if grant {
            self.bankroll = self.min_bet;
            self.stats.bailouts += 1;
            self.bailout_this_race = true;
            info!(bankroll = %self.bankroll, bailouts = self.stats.bailouts, "Bailout granted");
        }
    }

    // ========================================================================
    // Settlement
    // ========================================================================

    /// Settle both books against a finished race
    pub fn settle(&mut self, race: &RaceFinished) -> Result<RaceSettlement, SettlementError> {
        self.settle_order(race.finish_order(), &race.odds_table())
    }

    /// Settle both books against an explicit finish order
    ///
    /// Both books are settled before anything changes; on error the bets
    /// stay open and the bankroll is untouched.
    pub fn settle_order(
        &mut self,
        order: &[EntrantId],
        odds: &BTreeMap<EntrantId, u32>,
    ) -> Result<RaceSettlement, SettlementError> {
        let simple = self.simple.settle(order, odds)?;
        let exotic = self.exotic.settle(order)?;

        let total_staked = simple.total_staked + exotic.total_staked;
        let total_payout = simple.total_payout + exotic.total_payout;
        let net_profit = total_payout - total_staked;

        self.bankroll = (self.bankroll + total_payout).max(Decimal::ZERO);
        self.stats.record(net_profit);
        self.simple.clear_all();
        self.exotic.clear_all();
        self.bailout_this_race = false;

        info!(
            winner = ?order.first(),
            %total_staked,
            %total_payout,
            %net_profit,
            bankroll = %self.bankroll,
            "Race settled"
        );

        Ok(RaceSettlement {
            order: order.to_vec(),
            simple,
            exotic,
            total_staked,
            total_payout,
            net_profit,
            bankroll_after: self.bankroll,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::RaceSettings;
    use rust_decimal_macros::dec;

    fn config(bankroll: Decimal) -> WagerConfig {
        WagerConfig {
            starting_bankroll: bankroll,
            min_bet: dec!(1000000),
            bot_stake: dec!(1000000),
        }
    }

    fn race() -> RaceWaiting {
        RaceWaiting::seeded(RaceSettings::default(), None, 7)
    }

    fn id(n: u8) -> EntrantId {
        EntrantId::new(n)
    }

    fn order() -> Vec<EntrantId> {
        (1..=8).map(id).collect()
    }

    fn flat_odds(value: u32) -> BTreeMap<EntrantId, u32> {
        (1..=8).map(|n| (id(n), value)).collect()
    }

    #[test]
    fn test_stake_leaves_and_returns() {
        let race = race();
        let mut session = Session::new(&config(dec!(1000)));
        session.place_bet(&race, id(1), dec!(100), BetKind::Win).unwrap();
        assert_eq!(session.bankroll(), dec!(900));
        assert_eq!(session.snapshot().bankroll, dec!(1000));
        assert_eq!(session.clear_bet(id(1), BetKind::Win), dec!(100));
        assert_eq!(session.bankroll(), dec!(1000));
    }

    #[test]
    fn test_rejected_bet_changes_nothing() {
        let race = race();
        let mut session = Session::new(&config(dec!(50)));
        assert_eq!(
            session.place_bet(&race, id(1), dec!(100), BetKind::Win),
            Err(WagerError::InsufficientFunds {
                required: dec!(100),
                available: dec!(50)
            })
        );
        assert_eq!(
            session.place_bet(&race, id(9), dec!(10), BetKind::Win),
            Err(WagerError::UnknownEntrant { entrant: id(9) })
        );
        assert!(session
            .place_exotic(&race, ExoticKind::Exacta, &[id(1), id(1)], dec!(10))
            .is_err());
        assert_eq!(session.bankroll(), dec!(50));
        assert!(!session.has_open_bets());
    }

    #[test]
    fn test_settlement_credits_payout_and_stats() {
        let race = race();
        let mut session = Session::new(&config(dec!(1000)));
        session.place_bet(&race, id(1), dec!(100), BetKind::Win).unwrap();
        session
            .place_exotic(&race, ExoticKind::Exacta, &[id(2), id(1)], dec!(50))
            .unwrap();

        let result = session.settle_order(&order(), &flat_odds(4)).unwrap();
        assert_eq!(result.total_staked, dec!(150));
        assert_eq!(result.total_payout, dec!(400));
        assert_eq!(result.net_profit, dec!(250));
        assert_eq!(session.bankroll(), dec!(1250));
        assert_eq!(session.stats().wins, 1);
        assert_eq!(session.stats().biggest_win, dec!(250));
        assert!(!session.has_open_bets());
    }

    #[test]
    fn test_failed_settlement_keeps_bets_open() {
        let race = race();
        let mut session = Session::new(&config(dec!(1000)));
        session.place_bet(&race, id(8), dec!(100), BetKind::Win).unwrap();
        let short: Vec<_> = (1..=7).map(id).collect();
        assert!(session.settle_order(&short, &flat_odds(4)).is_err());
        assert_eq!(session.bankroll(), dec!(900));
        assert!(session.has_open_bets());
        assert_eq!(session.stats().races_watched, 0);
    }

    #[test]
    fn test_no_bailout_before_first_race() {
        let race = race();
        let mut session = Session::new(&config(dec!(0)));
        assert!(matches!(
            session.place_bet(&race, id(1), dec!(10), BetKind::Win),
            Err(WagerError::InsufficientFunds { .. })
        ));
        assert_eq!(session.stats().bailouts, 0);
    }

    #[test]
    fn test_bailout_tops_up_and_caps_stakes() {
        let race = race();
        let mut session = Session::new(&config(dec!(0)));
        session.settle_order(&order(), &flat_odds(4)).unwrap();
        assert_eq!(session.stats().races_watched, 1);

        assert_eq!(
            session.place_bet(&race, id(1), dec!(2000000), BetKind::Win),
            Err(WagerError::BailoutStakeLimit {
                amount: dec!(2000000),
                limit: dec!(1000000)
            })
        );
        assert_eq!(session.stats().bailouts, 0);

        session.place_bet(&race, id(1), dec!(400000), BetKind::Win).unwrap();
        assert!(session.bailout_active());
        assert_eq!(session.stats().bailouts, 1);
        assert_eq!(session.bankroll(), dec!(600000));

        session.settle_order(&order(), &flat_odds(4)).unwrap();
        assert!(!session.bailout_active());
        assert_eq!(session.bankroll(), dec!(2200000));
    }

    #[test]
    fn test_losing_race_tracks_biggest_loss() {
        let race = race();
        let mut session = Session::new(&config(dec!(1000)));
        session.place_bet(&race, id(5), dec!(300), BetKind::Win).unwrap();
        let result = session.settle_order(&order(), &flat_odds(4)).unwrap();
        assert_eq!(result.net_profit, dec!(-300));
        assert_eq!(session.stats().losses, 1);
        assert_eq!(session.stats().biggest_loss, dec!(300));
    }

    #[test]
    fn test_snapshot_roundtrip_json() {
        let snapshot = SessionSnapshot {
            bankroll: dec!(1234.5),
            stats: PlayerStats {
                races_watched: 3,
                bailouts: 1,
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);

        let session = Session::from_snapshot(back, &config(dec!(0)));
        assert_eq!(session.bankroll(), dec!(1234.5));
        assert_eq!(session.stats().races_watched, 3);
    }
}
