//! Plume binaries
//!
//! - `plume-race-simulated`: one race on a simulated clock, optionally
//!   exported to or rebuilt from peer race parameters
//! - `plume-bot-auto`: the bot betting race after race until Ctrl-C

pub mod common;
pub mod store;
