//! Bot statistics
//!
//! Observational only: nothing here feeds back into what the bot bets.
//! Per-entrant figures cover simple bets; exotic results count toward
//! their kind only.

use crate::config::constants::ACCURACY_HISTORY;
use crate::core::{AnyBetKind, EntrantId};
use crate::session::RaceSettlement;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindStats {
    pub bets: u32,
    pub wins: u32,
    pub profit: Decimal,
}

impl KindStats {
    fn record(&mut self, won: bool, profit: Decimal) {
        self.bets += 1;
        if won {
            self.wins += 1;
        }
        self.profit += profit;
    }
}

pub type EntrantStats = KindStats;

/// Whether the advised entrants included the winner of one race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccuracyRecord {
    pub race: u64,
    pub recommended_winner: bool,
    pub actual_winner: Option<EntrantId>,
    pub recommended: Vec<EntrantId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotStats {
    pub total_races: u64,
    pub total_bets: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_profit: Decimal,
    pub by_kind: BTreeMap<AnyBetKind, KindStats>,
    pub by_entrant: BTreeMap<EntrantId, EntrantStats>,
    accuracy: VecDeque<AccuracyRecord>,
}

impl BotStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one settled race into the totals
    ///
    /// `recommended` is empty when the strategy had no advice; such races
    /// are left out of the accuracy history.
    pub fn record_race(&mut self, settlement: &RaceSettlement, recommended: &[EntrantId]) {
        self.total_races += 1;

        for result in &settlement.simple.results {
            let kind = AnyBetKind::from(result.bet.kind);
            self.record_bet(kind, result.outcome.won, result.outcome.profit);
            self.by_entrant
                .entry(result.bet.entrant)
                .or_default()
                .record(result.outcome.won, result.outcome.profit);
        }
        for result in &settlement.exotic.results {
            let kind = AnyBetKind::from(result.bet.kind);
            self.record_bet(kind, result.outcome.won, result.outcome.profit);
        }

        if !recommended.is_empty() {
            let winner = settlement.order.first().copied();
            self.accuracy.push_back(AccuracyRecord {
                race: self.total_races,
                recommended_winner: winner.map_or(false, |w| recommended.contains(&w)),
                actual_winner: winner,
                recommended: recommended.to_vec(),
            });
            while self.accuracy.len() > ACCURACY_HISTORY {
                self.accuracy.pop_front();
            }
        }
    }

    fn record_bet(&mut self, kind: AnyBetKind, won: bool, profit: Decimal) {
        self.total_bets += 1;
        if won {
            self.total_wins += 1;
        } else {
            self.total_losses += 1;
        }
        self.total_profit += profit;
        self.by_kind.entry(kind).or_default().record(won, profit);
    }

    pub fn accuracy_history(&self) -> impl Iterator<Item = &AccuracyRecord> {
        self.accuracy.iter()
    }

    /// Percentage of recorded races whose winner was among the advised entrants
    pub fn recommendation_accuracy(&self) -> f64 {
        if self.accuracy.is_empty() {
            return 0.0;
        }
        let hits = self.accuracy.iter().filter(|a| a.recommended_winner).count();
        hits as f64 / self.accuracy.len() as f64 * 100.0
    }

    /// Percentage of winning bets of one kind
    pub fn win_rate(&self, kind: AnyBetKind) -> f64 {
        match self.by_kind.get(&kind) {
            Some(s) if s.bets > 0 => s.wins as f64 / s.bets as f64 * 100.0,
            _ => 0.0,
        }
    }

    /// Percentage of winning bets overall
    pub fn overall_win_rate(&self) -> f64 {
        if self.total_bets == 0 {
            0.0
        } else {
            self.total_wins as f64 / self.total_bets as f64 * 100.0
        }
    }

    /// Kind with the highest cumulative profit; earliest kind wins ties
    pub fn best_kind(&self) -> Option<AnyBetKind> {
        let mut best: Option<(AnyBetKind, Decimal)> = None;
        for (kind, stats) in &self.by_kind {
            if best.map_or(true, |(_, profit)| stats.profit > profit) {
                best = Some((*kind, stats.profit));
            }
        }
        best.map(|(kind, _)| kind)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
