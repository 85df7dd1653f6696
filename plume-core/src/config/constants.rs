//! Tuned constants for the race and wagering engine
//!
//! Values that peers must agree on (odds buckets, event table, finish
//! threshold) live here rather than in runtime configuration. The
//! forced-completion and geometry values seed the defaults of the
//! corresponding config structs.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===== ROSTER =====

/// Entrants per race
pub const FIELD_SIZE: usize = 8;

pub const BASE_SPEED_RANGE: (f64, f64) = (0.5, 1.3);
pub const STAMINA_RANGE: (f64, f64) = (0.5, 1.0);
pub const CONSISTENCY_RANGE: (f64, f64) = (0.4, 1.0);

/// Weights of the rating used for odds
pub const SPEED_WEIGHT: f64 = 0.5;
pub const STAMINA_WEIGHT: f64 = 0.3;
pub const CONSISTENCY_WEIGHT: f64 = 0.2;

/// Odds buckets: rating floor → payout multiplier, checked top-down
pub const ODDS_BUCKETS: [(f64, u32); 7] = [
    (1.1, 2),
    (1.0, 3),
    (0.9, 4),
    (0.8, 5),
    (0.7, 6),
    (0.6, 8),
    (0.5, 10),
];

/// Odds below every bucket floor
pub const LONGSHOT_ODDS: u32 = 12;

// ===== TIME OF DAY AFFINITY =====

pub const AFFINITY_MATCH: f64 = 1.15;
pub const AFFINITY_OPPOSITE: f64 = 0.90;
pub const AFFINITY_ONE_STEP: f64 = 0.95;
pub const AFFINITY_TWO_STEPS: f64 = 0.98;
pub const AFFINITY_NEUTRAL: f64 = 1.0;

// ===== RACE =====

/// Race length in milliseconds; also the hard time cap
pub const RACE_LENGTH_MS: f64 = 10_000.0;

/// Countdown ticks before the start
pub const COUNTDOWN_TICKS: u32 = 3;

/// Position at which an entrant counts as finished (avoids float stalls at 1.0)
pub const FINISH_THRESHOLD: f64 = 0.999;

/// Finishers needed to settle every exotic kind
pub const REQUIRED_FINISHERS: usize = 4;

/// Amplitude of the consistency-scaled speed noise
pub const SPEED_NOISE_AMPLITUDE: f64 = 0.5;

/// Late-race slowdown factor for low-stamina entrants
pub const STAMINA_DECAY: f64 = 0.5;

/// Minimum race-clock spacing between lead-change notices
pub const LEAD_CHANGE_SPACING_MS: f64 = 1_000.0;

// ===== FORCED COMPLETION =====

/// (a) With exactly 3 finishers, a 4th this close to the line is finished
pub const FORCE_FOURTH_WITHIN: f64 = 0.02;

/// (b) Clock fraction and minimum progress for the first sweep
pub const FORCE_LATE_CLOCK: f64 = 0.90;
pub const FORCE_LATE_PROGRESS: f64 = 0.95;

/// (c) Clock fraction and minimum progress for the fill-to-four sweep
pub const FORCE_FILL_CLOCK: f64 = 0.95;
pub const FORCE_FILL_PROGRESS: f64 = 0.90;

/// (d) Synthetic finish time spread per unit of remaining distance
pub const SYNTHETIC_TIME_SPREAD_MS: f64 = 1_000.0;

// ===== EVENTS =====

/// Entrants at or beyond this progress never receive new events
pub const EVENT_FREE_ZONE: f64 = 0.95;

/// Nominal frame length used by the event cadence
pub const EVENT_FRAME_MS: f64 = 16.0;

/// Events are rolled on one frame out of this many; probabilities are
/// multiplied by the same factor
pub const EVENT_CHECK_STRIDE: u64 = 60;

/// Spontaneous events allowed across the field at once
pub const MAX_CONCURRENT_EVENTS: usize = 1;

/// Severity lower bound for the most resilient entrant
pub const MIN_EVENT_SEVERITY: f64 = 0.5;

/// Chain-reaction candidates considered per source event
pub const CHAIN_CANDIDATES: usize = 2;

// ===== CHAIN GEOMETRY (entrant-length units) =====

pub const TRACK_LENGTH_UNITS: f64 = 12.0;
pub const LANE_SPACING_UNITS: f64 = 0.3;
/// Unreachable while each entrant runs in its own lane
pub const SAME_LANE_REACH: f64 = 1.0;
pub const ADJACENT_LANE_REACH: f64 = 0.5;

// ===== MONEY =====

/// Starting bankroll for a new player
pub const DEFAULT_BANKROLL: Decimal = dec!(1000000);

/// Minimum bet, also the bailout top-up amount
pub const MIN_BET: Decimal = dec!(1000000);

/// Stake the bot uses per intent
pub const BOT_STAKE: Decimal = dec!(1000000);

// ===== PAYOUT MULTIPLIERS =====

/// Place pays this share of the win odds
pub const PLACE_ODDS_SHARE: Decimal = dec!(0.4);
/// Show pays this share of the win odds
pub const SHOW_ODDS_SHARE: Decimal = dec!(0.3);
/// Show never pays less than this multiplier
pub const SHOW_MIN_MULTIPLIER: Decimal = dec!(1.1);

pub const EXACTA_MULTIPLIER: u32 = 15;
pub const TRIFECTA_MULTIPLIER: u32 = 50;
pub const SUPERFECTA_MULTIPLIER: u32 = 200;
pub const QUINELLA_MULTIPLIER: u32 = 8;

// ===== BOT =====

/// Recommendation-accuracy history kept by the bot
pub const ACCURACY_HISTORY: usize = 100;

/// Host frame interval the engine ticks at
pub const FRAME_MS: u64 = 16;

/// Wall time between countdown ticks
pub const COUNTDOWN_INTERVAL_MS: u64 = 1_000;

/// Upper bound on waiting for an announcement to finish
pub const ANNOUNCEMENT_TIMEOUT_MS: u64 = 10_000;

/// Pause between races in the full-auto loop
pub const RESULTS_PAUSE_MS: u64 = 3_000;
