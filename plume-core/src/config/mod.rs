pub mod constants;
pub mod types;

pub use types::*;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::path::Path;

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing sections and fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();

        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read configuration {}", config_path.display()))?;

        let cfg: Config =
            serde_json::from_str(&raw).context("Failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.race.race_length_ms > 0.0) {
            anyhow::bail!("race_length_ms must be positive");
        }

        if self.race.notice_capacity == 0 {
            anyhow::bail!("notice_capacity must be at least 1");
        }

        let f = &self.forced;
        for (name, value) in [
            ("fourth_within", f.fourth_within),
            ("late_clock", f.late_clock),
            ("late_progress", f.late_progress),
            ("fill_clock", f.fill_clock),
            ("fill_progress", f.fill_progress),
        ] {
            if !(0.0..=1.0).contains(&value) {
                anyhow::bail!("forced.{} must be within [0, 1], got {}", name, value);
            }
        }

        if f.late_clock > f.fill_clock {
            anyhow::bail!(
                "forced.late_clock ({}) cannot exceed forced.fill_clock ({})",
                f.late_clock,
                f.fill_clock
            );
        }

        if f.synthetic_time_spread_ms < 0.0 {
            anyhow::bail!("synthetic_time_spread_ms cannot be negative");
        }

        let g = &self.chain;
        if g.track_length <= 0.0 || g.lane_spacing <= 0.0 {
            anyhow::bail!("chain geometry must have positive track length and lane spacing");
        }

        if g.same_lane_reach < 0.0 || g.adjacent_lane_reach < 0.0 {
            anyhow::bail!("chain reach cannot be negative");
        }

        if self.wager.min_bet <= Decimal::ZERO {
            anyhow::bail!("min_bet must be positive");
        }

        if self.wager.bot_stake <= Decimal::ZERO {
            anyhow::bail!("bot_stake must be positive");
        }

        if self.wager.starting_bankroll < Decimal::ZERO {
            anyhow::bail!("starting_bankroll cannot be negative");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}', must be one of: {:?}",
                self.logging.level,
                valid_log_levels
            );
        }

        Ok(())
    }
}
