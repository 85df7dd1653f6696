//! Full-Auto Bot
//!
//! The bot bets, watches and settles races back to back until Ctrl-C or
//! `--races`. Between races it waits for the results announcement, never
//! longer than the announcement timeout, and stops waiting at once on
//! Ctrl-C. The session is resumed from and saved to `--session`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use plume_bins::common::{
    current_time_of_day, init_logging, install_shutdown_handler, print_stats, CommonArgs,
};
use plume_bins::store::SessionStore;
use plume_core::config::constants::{ANNOUNCEMENT_TIMEOUT_MS, RESULTS_PAUSE_MS};
use plume_core::engine::{await_announcement, AnnouncementOutcome, RaceOutcome};
use plume_core::prelude::*;
use plume_core::EntrantId;
use plume_strategies::{Conservative, FixedFeed, Recommendation, Recommended};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    Conservative,
    Recommended,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long, value_enum, default_value = "conservative")]
    strategy: StrategyKind,

    /// Advised entrant ordinals for the recommended strategy, e.g. 3,5
    #[arg(long, value_delimiter = ',')]
    advise: Vec<u8>,

    /// Stop after this many races
    #[arg(long)]
    races: Option<u64>,

    /// Session file
    #[arg(long, default_value = "plume-session.json")]
    session: PathBuf,

    /// Race in wall-clock time instead of a simulated clock
    #[arg(long)]
    realtime: bool,

    /// Results pause between races in milliseconds
    /// (default: the full pause in real time, none when simulated)
    #[arg(long)]
    pause_ms: Option<u64>,
}

struct RunSettings {
    config: Config,
    store: SessionStore,
    races: Option<u64>,
    pause: Duration,
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.load_config()?;
    init_logging(&args.common, &config);

    tracing::info!("=== Plume: Full-Auto Bot ===");

    let pause = Duration::from_millis(args.pause_ms.unwrap_or(if args.realtime {
        RESULTS_PAUSE_MS
    } else {
        0
    }));
    let ctx = RunSettings {
        store: SessionStore::new(&args.session),
        races: args.races,
        pause,
        seed: args.common.seed,
        config,
    };

    match (args.strategy, args.realtime) {
        (StrategyKind::Conservative, false) => drive(Conservative, SimulatedClock::default(), ctx),
        (StrategyKind::Conservative, true) => drive(Conservative, SystemClock, ctx),
        (StrategyKind::Recommended, realtime) => {
            let advice = args
                .advise
                .iter()
                .map(|n| Recommendation::win(EntrantId::new(*n)))
                .collect();
            let strategy = Recommended::new(FixedFeed::new(advice));
            if realtime {
                drive(strategy, SystemClock, ctx)
            } else {
                drive(strategy, SimulatedClock::default(), ctx)
            }
        }
    }
}

fn drive<S: Strategy, C: Clock>(strategy: S, clock: C, ctx: RunSettings) -> Result<()> {
    let session = ctx.store.load(&ctx.config.wager)?;
    let mut engine = Engine::new(strategy, clock, session, &ctx.config);

    let (cancel_tx, mut cancel_rx) = watch::channel(false);
    install_shutdown_handler(engine.shutdown_signal(), move || {
        let _ = cancel_tx.send(true);
    })?;

    let runtime = Runtime::new().context("Failed to start async runtime")?;
    let timeout = Duration::from_millis(ANNOUNCEMENT_TIMEOUT_MS);
    let pause = ctx.pause;

    let settings = RaceSettings::from(&ctx.config);
    let first = match ctx.seed {
        Some(seed) => RaceWaiting::seeded(settings, Some(current_time_of_day()), seed),
        None => RaceWaiting::offline(settings, Some(current_time_of_day())),
    };

    let result = engine.run(
        first,
        ctx.races,
        || Some(current_time_of_day()),
        |outcome: &RaceOutcome| {
            report(outcome);
            if pause.is_zero() {
                return true;
            }
            let waited = runtime.block_on(async {
                await_announcement(tokio::time::sleep(pause), timeout, &mut cancel_rx).await
            });
            match waited {
                AnnouncementOutcome::Completed(()) => true,
                AnnouncementOutcome::TimedOut => {
                    tracing::warn!("Results announcement timed out, moving on");
                    true
                }
                AnnouncementOutcome::Cancelled => false,
            }
        },
    );

    // Save even when the loop failed part way
    ctx.store.save(engine.session())?;
    let stats = result?;
    print_stats(&stats, engine.bot_stats());
    Ok(())
}

fn report(outcome: &RaceOutcome) {
    let s = &outcome.settlement;
    tracing::info!(
        winner = ?outcome.race.winner(),
        bets = outcome.bets_placed,
        staked = %s.total_staked,
        payout = %s.total_payout,
        net = %s.net_profit,
        bankroll = %s.bankroll_after,
        "Race settled"
    );
}
