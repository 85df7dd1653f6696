use super::constants::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub race: RaceConfig,
    #[serde(default)]
    pub forced: ForcedCompletionConfig,
    #[serde(default)]
    pub chain: ChainGeometry,
    #[serde(default)]
    pub wager: WagerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Race clock configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RaceConfig {
    /// Race length in milliseconds (hard cap)
    #[serde(default = "default_race_length")]
    pub race_length_ms: f64,

    /// Countdown ticks before the start
    #[serde(default = "default_countdown_ticks")]
    pub countdown_ticks: u32,

    /// Capacity of the notice channel handed to listeners
    #[serde(default = "default_notice_capacity")]
    pub notice_capacity: usize,
}

/// Thresholds of the forced-completion sweeps
///
/// Clock values are fractions of the race length, progress values are
/// fractions of the course.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForcedCompletionConfig {
    /// With three finishers, a fourth within this distance of the line is finished
    #[serde(default = "default_fourth_within")]
    pub fourth_within: f64,

    #[serde(default = "default_late_clock")]
    pub late_clock: f64,
    #[serde(default = "default_late_progress")]
    pub late_progress: f64,

    #[serde(default = "default_fill_clock")]
    pub fill_clock: f64,
    #[serde(default = "default_fill_progress")]
    pub fill_progress: f64,

    /// Milliseconds added per unit of remaining distance for projected finishes
    #[serde(default = "default_time_spread")]
    pub synthetic_time_spread_ms: f64,
}

/// Track geometry for chain reactions, in entrant-length units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChainGeometry {
    #[serde(default = "default_track_length")]
    pub track_length: f64,
    #[serde(default = "default_lane_spacing")]
    pub lane_spacing: f64,
    #[serde(default = "default_same_lane_reach")]
    pub same_lane_reach: f64,
    #[serde(default = "default_adjacent_lane_reach")]
    pub adjacent_lane_reach: f64,
}

/// Money configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WagerConfig {
    /// Bankroll of a new player
    #[serde(default = "default_bankroll")]
    pub starting_bankroll: Decimal,

    /// Minimum bet and bailout top-up amount
    #[serde(default = "default_min_bet")]
    pub min_bet: Decimal,

    /// Stake per bot intent
    #[serde(default = "default_bot_stake")]
    pub bot_stake: Decimal,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_race_length() -> f64 {
    RACE_LENGTH_MS
}

fn default_countdown_ticks() -> u32 {
    COUNTDOWN_TICKS
}

fn default_notice_capacity() -> usize {
    256
}

fn default_fourth_within() -> f64 {
    FORCE_FOURTH_WITHIN
}

fn default_late_clock() -> f64 {
    FORCE_LATE_CLOCK
}

fn default_late_progress() -> f64 {
    FORCE_LATE_PROGRESS
}

fn default_fill_clock() -> f64 {
    FORCE_FILL_CLOCK
}

fn default_fill_progress() -> f64 {
    FORCE_FILL_PROGRESS
}

fn default_time_spread() -> f64 {
    SYNTHETIC_TIME_SPREAD_MS
}

fn default_track_length() -> f64 {
    TRACK_LENGTH_UNITS
}

fn default_lane_spacing() -> f64 {
    LANE_SPACING_UNITS
}

fn default_same_lane_reach() -> f64 {
    SAME_LANE_REACH
}

fn default_adjacent_lane_reach() -> f64 {
    ADJACENT_LANE_REACH
}

fn default_bankroll() -> Decimal {
    DEFAULT_BANKROLL
}

fn default_min_bet() -> Decimal {
    MIN_BET
}

fn default_bot_stake() -> Decimal {
    BOT_STAKE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            race_length_ms: default_race_length(),
            countdown_ticks: default_countdown_ticks(),
            notice_capacity: default_notice_capacity(),
        }
    }
}

impl Default for ForcedCompletionConfig {
    fn default() -> Self {
        Self {
            fourth_within: default_fourth_within(),
            late_clock: default_late_clock(),
            late_progress: default_late_progress(),
            fill_clock: default_fill_clock(),
            fill_progress: default_fill_progress(),
            synthetic_time_spread_ms: default_time_spread(),
        }
    }
}

impl Default for ChainGeometry {
    fn default() -> Self {
        Self {
            track_length: default_track_length(),
            lane_spacing: default_lane_spacing(),
            same_lane_reach: default_same_lane_reach(),
            adjacent_lane_reach: default_adjacent_lane_reach(),
        }
    }
}

impl Default for WagerConfig {
    fn default() -> Self {
        Self {
            starting_bankroll: default_bankroll(),
            min_bet: default_min_bet(),
            bot_stake: default_bot_stake(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
