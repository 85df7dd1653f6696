//! Generic Bot Engine
//!
//! ## Race Pipeline
//!
//! ```text
//!   RaceWaiting ──► RaceCard ──► Strategy::plan() ──► Session::place_*
//!                                                         │
//!                                   rejected bets: warn! and skip
//!                                                         ▼
//!   start_countdown() ──► tick every COUNTDOWN_INTERVAL_MS ──► RaceRacing
//!                                                         │
//!                           tick(clock.now_ms()) every FRAME_MS
//!                                                         ▼
//!   RaceFinished ──► Session::settle() ──► BotStats::record_race()
//! ```
//!
//! The engine is generic over the strategy and the clock; with a
//! [`SimulatedClock`](super::SimulatedClock) a full race runs in
//! microseconds and is fully reproducible for a given seed.

use super::clock::Clock;
use super::stats::BotStats;
use super::{BetIntent, RaceCard, Strategy};
use crate::config::constants::{COUNTDOWN_INTERVAL_MS, FRAME_MS};
use crate::config::Config;
use crate::core::TimeOfDay;
use crate::race::{CountdownResult, RaceFinished, RaceWaiting, TickResult};
use crate::session::{RaceSettlement, Session};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// One finished and settled race
#[derive(Debug)]
pub struct RaceOutcome {
    pub race: RaceFinished,
    pub settlement: RaceSettlement,
    pub bets_placed: usize,
    pub bets_rejected: usize,
}

/// Engine statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub races_run: u64,
    pub ticks_processed: u64,
    pub bets_placed: u64,
    pub bets_rejected: u64,
}

pub struct Engine<S: Strategy, C: Clock> {
    strategy: S,
    clock: C,
    session: Session,
    bot_stats: BotStats,
    stake: Decimal,
    stats: EngineStats,
    shutdown: Arc<AtomicBool>,
}

impl<S: Strategy, C: Clock> Engine<S, C> {
    pub fn new(strategy: S, clock: C, session: Session, config: &Config) -> Self {
        info!("Initializing engine: {}", strategy.name());
        Self {
            strategy,
            clock,
            session,
            bot_stats: BotStats::new(),
            stake: config.wager.bot_stake,
            stats: EngineStats::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag checked before each race; a race already under way runs to settlement
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn bot_stats(&self) -> &BotStats {
        &self.bot_stats
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Place the strategy's bets on a waiting race
    ///
    /// Returns (placed, rejected). A rejected bet never aborts the race.
    pub fn place_bets(&mut self, race: &RaceWaiting) -> (usize, usize) {
        let stake = self.stake;
        let card = RaceCard::from_race(race, stake, self.session.bankroll());
        let intents = self.strategy.plan(&card);

        let mut placed = 0;
        let mut rejected = 0;
        for intent in intents {
            let result = match &intent {
                BetIntent::Simple { entrant, kind } => {
                    self.session.place_bet(race, *entrant, stake, *kind).map(|_| ())
                }
                BetIntent::Exotic { kind, picks } => {
                    self.session.place_exotic(race, *kind, picks, stake).map(|_| ())
                }
            };
            match result {
                Ok(()) => placed += 1,
                Err(e) => {
                    rejected += 1;
                    warn!(strategy = self.strategy.name(), intent = ?intent, error = %e, "Bot bet rejected");
                }
            }
        }
        self.stats.bets_placed += placed as u64;
        self.stats.bets_rejected += rejected as u64;
        (placed, rejected)
    }

    /// Bet, run and settle one race
    pub fn run_race(&mut self, race: RaceWaiting) -> Result<RaceOutcome> {
        let (bets_placed, bets_rejected) = self.place_bets(&race);

        let mut counting = race.start_countdown();
        let mut racing = loop {
            match counting.tick(self.clock.now_ms()) {
                CountdownResult::Counting(c) => {
                    counting = c;
                    self.clock.sleep_ms(COUNTDOWN_INTERVAL_MS);
                }
                CountdownResult::Started(r) => break r,
            }
        };

        let finished = loop {
            self.clock.sleep_ms(FRAME_MS);
            self.stats.ticks_processed += 1;
            match racing.tick(self.clock.now_ms()) {
                TickResult::Running(r) => racing = r,
                TickResult::Finished(f) => break f,
            }
        };

        let settlement = self
            .session
            .settle(&finished)
            .context("Failed to settle finished race")?;
        self.bot_stats
            .record_race(&settlement, self.strategy.recommendations());
        self.stats.races_run += 1;

        info!(
            strategy = self.strategy.name(),
            winner = ?finished.winner(),
            net_profit = %settlement.net_profit,
            bankroll = %settlement.bankroll_after,
            "Race complete"
        );

        Ok(RaceOutcome {
            race: finished,
            settlement,
            bets_placed,
            bets_rejected,
        })
    }

    /// Run races back to back until shutdown or `max_races`
    ///
    /// Each race continues the previous race's random stream. `on_race`
    /// sees every outcome and may stop the loop by returning `false`.
    pub fn run<T, F>(
        &mut self,
        first: RaceWaiting,
        max_races: Option<u64>,
        mut time_of_day: T,
        mut on_race: F,
    ) -> Result<EngineStats>
    where
        T: FnMut() -> Option<TimeOfDay>,
        F: FnMut(&RaceOutcome) -> bool,
    {
        info!("Starting engine main loop");
        let mut next = Some(first);
        let mut run = 0u64;

        while let Some(race) = next.take() {
            if self.is_shutdown() {
                info!("Shutdown requested");
                break;
            }
            let outcome = self.run_race(race)?;
            run += 1;
            let keep_going = on_race(&outcome);
            if !keep_going || max_races.map_or(false, |max| run >= max) {
                break;
            }
            next = Some(outcome.race.next_race(time_of_day()));
        }

        info!("Engine stopped. Stats: {:?}", self.stats);
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BetKind, EntrantId, ExoticKind};
    use crate::engine::SimulatedClock;
    use crate::race::RaceSettings;
    use rust_decimal_macros::dec;

    struct FavoriteStrategy;

    impl Strategy for FavoriteStrategy {
        fn plan(&mut self, card: &RaceCard) -> Vec<BetIntent> {
            let favorite = card
                .entries
                .iter()
                .min_by_key(|e| (e.odds, e.id))
                .map(|e| e.id)
                .unwrap_or(EntrantId::new(1));
            vec![
                BetIntent::Simple {
                    entrant: favorite,
                    kind: BetKind::Show,
                },
                BetIntent::Exotic {
                    kind: ExoticKind::Exacta,
                    picks: vec![favorite, favorite],
                },
            ]
        }

        fn name(&self) -> &'static str {
            "Favorite"
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.wager.bot_stake = dec!(100);
        config
    }

    fn engine() -> Engine<FavoriteStrategy, SimulatedClock> {
        let config = config();
        Engine::new(
            FavoriteStrategy,
            SimulatedClock::starting_at(1_000),
            Session::new(&config.wager),
            &config,
        )
    }

    #[test]
    fn test_run_race_places_settles_and_records() {
        let mut engine = engine();
        let race = RaceWaiting::seeded(RaceSettings::default(), None, 99);
        let outcome = engine.run_race(race).unwrap();

        assert_eq!(outcome.bets_placed, 1);
        assert_eq!(outcome.bets_rejected, 1);
        assert_eq!(outcome.race.finish_order().len(), 8);
        assert_eq!(outcome.settlement.total_staked, dec!(100));
        assert_eq!(engine.bot_stats().total_races, 1);
        assert_eq!(engine.session().stats().races_watched, 1);
        assert!(!engine.session().has_open_bets());
        assert!(engine.stats().ticks_processed > 0);
    }

    #[test]
    fn test_same_seed_same_result() {
        let a = engine()
            .run_race(RaceWaiting::seeded(RaceSettings::default(), None, 5))
            .unwrap();
        let b = engine()
            .run_race(RaceWaiting::seeded(RaceSettings::default(), None, 5))
            .unwrap();
        assert_eq!(a.race.finish_order(), b.race.finish_order());
        assert_eq!(a.settlement.net_profit, b.settlement.net_profit);
    }

    #[test]
    fn test_run_stops_at_max_races() {
        let mut engine = engine();
        let first = RaceWaiting::seeded(RaceSettings::default(), None, 3);
        let mut seen = 0;
        let stats = engine
            .run(first, Some(3), || None, |_| {
                seen += 1;
                true
            })
            .unwrap();
        assert_eq!(stats.races_run, 3);
        assert_eq!(seen, 3);
    }

    #[test]
    fn test_run_honours_shutdown() {
        let mut engine = engine();
        engine.shutdown_signal().store(true, Ordering::Release);
        let first = RaceWaiting::seeded(RaceSettings::default(), None, 3);
        let stats = engine.run(first, None, || None, |_| true).unwrap();
        assert_eq!(stats.races_run, 0);
    }

    #[test]
    fn test_shutdown_mid_session_settles_current_race() {
        let mut engine = engine();
        let signal = engine.shutdown_signal();
        let first = RaceWaiting::seeded(RaceSettings::default(), None, 3);
        let stats = engine
            .run(first, None, || None, |_| {
                signal.store(true, Ordering::Release);
                true
            })
            .unwrap();
        assert_eq!(stats.races_run, 1);
        assert!(!engine.session().has_open_bets());
    }
}
