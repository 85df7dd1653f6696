//! Common utilities for all binaries
//!
//! Shared initialization, CLI parsing, and setup code.

use anyhow::{Context, Result};
use clap::Args;
use plume_core::engine::{BotStats, Clock, EngineStats, SystemClock};
use plume_core::{Config, TimeOfDay};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Common CLI arguments for all binaries
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// JSON configuration file; defaults apply when absent
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the first race; omit for an unseeded offline race
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Log level (overrides the configuration)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit JSON logs
    #[arg(long)]
    pub json_logs: bool,
}

impl CommonArgs {
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            None => Ok(Config::default()),
        }
    }
}

/// Initialize tracing/logging; CLI flags win over the configuration
pub fn init_logging(args: &CommonArgs, config: &Config) {
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    let json = args.json_logs || config.logging.json;
    if !plume_core::utils::init_logger(level, json) {
        eprintln!("Logger already initialized");
    }
}

/// Set `flag` on Ctrl-C, then run `on_signal`
pub fn install_shutdown_handler<F>(flag: Arc<AtomicBool>, mut on_signal: F) -> Result<()>
where
    F: FnMut() + Send + 'static,
{
    ctrlc::set_handler(move || {
        tracing::warn!("Ctrl-C received, finishing current race");
        flag.store(true, Ordering::Release);
        on_signal();
    })
    .context("Failed to install Ctrl-C handler")
}

/// Period of the day for the current UTC hour
pub fn current_time_of_day() -> TimeOfDay {
    let hour = (SystemClock.now_ms() / 3_600_000) % 24;
    TimeOfDay::from_hour(hour as u32)
}

/// Print final statistics
pub fn print_stats(stats: &EngineStats, bot: &BotStats) {
    tracing::info!("=== Final Statistics ===");
    tracing::info!("Races run: {}", stats.races_run);
    tracing::info!("Ticks processed: {}", stats.ticks_processed);
    tracing::info!("Bets placed: {}", stats.bets_placed);
    tracing::info!("Bets rejected: {}", stats.bets_rejected);
    tracing::info!("Bot profit: {}", bot.total_profit);
    tracing::info!("Bot win rate: {:.2}%", bot.overall_win_rate());

    if let Some(kind) = bot.best_kind() {
        tracing::info!("Best bet kind: {}", kind);
    }
    if bot.accuracy_history().next().is_some() {
        tracing::info!("Advice accuracy: {:.2}%", bot.recommendation_accuracy());
    }
}
