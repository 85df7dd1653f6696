//! Plume Strategies - Betting Strategies for the Plume Bot
//!
//! Strategies see a read-only [`RaceCard`](plume_core::RaceCard) and return
//! the bets they want placed. The engine supplies the stake, places each
//! bet through the session and skips any the session rejects.
//!
//! ## Available Strategies
//!
//! ### [`Conservative`] - Rule-Based
//!
//! Ranks entrants by odds adjusted for their pre-race condition and
//! avoids Sick and Tired entrants.
//!
//! | Bet        | Condition (top of adjusted field)        |
//! |------------|------------------------------------------|
//! | Win/Place  | first two viable, each priced 8-1 or less |
//! | Superfecta | top four ≤ 2 / 3 / 4 / 6                 |
//! | Trifecta   | otherwise, top three ≤ 2.5 / 4 / 5       |
//! | Exacta     | top two ≤ 4 / 6                          |
//! | Quinella   | no exacta, top two ≤ 6 / 7               |
//!
//! ### [`Recommended`] - Advisor-Driven
//!
//! Bets what a [`RecommendationFeed`] advises and reports the advised
//! entrants so the engine can track advice accuracy. Falls back to
//! [`Conservative`] when there is no advice for the card.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use plume_core::prelude::*;
//! use plume_strategies::Conservative;
//!
//! let config = Config::default();
//! let mut engine = Engine::new(
//!     Conservative,
//!     SimulatedClock::default(),
//!     Session::new(&config.wager),
//!     &config,
//! );
//! let race = RaceWaiting::seeded(RaceSettings::default(), None, 42);
//! let outcome = engine.run_race(race)?;
//! println!("{:?}", outcome.race.finish_order());
//! # Ok::<(), plume_core::Error>(())
//! ```

pub mod conservative;
pub mod recommended;

mod test_helpers;

pub use conservative::Conservative;
pub use recommended::{FixedFeed, NoRecommendations, Recommendation, RecommendationFeed, Recommended};
