//! Single Race on a Simulated Clock
//!
//! Runs one race frame by frame with instant sleeps and logs notices,
//! periodic leader reports and the final order.
//!
//! With `--params-out` the race parameters are written for a joining
//! peer; with `--params-in` the race is rebuilt from a host's parameters
//! instead of drawn locally.

use anyhow::{Context, Result};
use clap::Parser;
use plume_bins::common::{init_logging, CommonArgs};
use plume_core::config::constants::{COUNTDOWN_INTERVAL_MS, FRAME_MS};
use plume_core::engine::{Clock, SimulatedClock};
use plume_core::prelude::*;
use plume_core::RaceParameters;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = FRAME_MS)]
    frame_ms: u64,

    /// Log the leader every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Write this race's parameters as JSON
    #[arg(long)]
    params_out: Option<PathBuf>,

    /// Rebuild the race from a host's parameters JSON
    #[arg(long, conflicts_with = "params_out")]
    params_in: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.common.load_config()?;
    init_logging(&args.common, &config);

    tracing::info!("=== Plume: Simulated Race ===");

    let settings = RaceSettings::from(&config);
    let mut race = match &args.params_in {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let params = RaceParameters::from_json(&raw)?;
            tracing::info!(race_id = %params.race_id, "Joining race from parameters");
            RaceWaiting::from_parameters(&params, settings)?
        }
        None => match args.common.seed {
            Some(seed) => RaceWaiting::seeded(settings, None, seed),
            None => RaceWaiting::offline(settings, None),
        },
    };

    if let Some(path) = &args.params_out {
        let params = race.parameters().context("Offline races cannot be shared")?;
        std::fs::write(path, params.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(race_id = %params.race_id, path = %path.display(), "Race parameters written");
    }

    for entrant in race.roster().iter() {
        let condition = race
            .pre_race_events()
            .get(entrant.id)
            .map_or("", |c| c.label());
        tracing::info!("{} {:<12} {:>2}-1 {}", entrant.id, entrant.name(), entrant.odds, condition);
    }

    let notices = race.subscribe();
    let mut clock = SimulatedClock::starting_at(1_000);

    let mut counting = race.start_countdown();
    let mut racing = loop {
        match counting.tick(clock.now_ms()) {
            CountdownResult::Counting(c) => {
                tracing::info!("{}...", c.remaining());
                counting = c;
                clock.sleep_ms(COUNTDOWN_INTERVAL_MS);
            }
            CountdownResult::Started(r) => break r,
        }
    };

    let finished = loop {
        clock.sleep_ms(args.frame_ms);
        for notice in notices.try_iter() {
            tracing::info!("{}", notice.label());
        }
        match racing.tick(clock.now_ms()) {
            TickResult::Running(r) => {
                if args.report_every > 0 && r.ticks() % args.report_every == 0 {
                    let frame = r.frame();
                    if let Some(leader) = frame.leader.and_then(|id| frame.entrant(id)) {
                        tracing::info!(
                            "{:>6.0}ms leader {} at {:.1}%",
                            frame.clock_ms,
                            leader.name,
                            leader.position * 100.0
                        );
                    }
                }
                racing = r;
            }
            TickResult::Finished(f) => break f,
        }
    };
    for notice in notices.try_iter() {
        tracing::info!("{}", notice.label());
    }

    tracing::info!("=== Result ({:.0}ms) ===", finished.elapsed_ms());
    for (rank, id) in finished.finish_order().iter().enumerate() {
        let name = finished.roster().get(*id).map_or("?", |e| e.name());
        tracing::info!("{}. {} {}", rank + 1, id, name);
    }

    Ok(())
}
