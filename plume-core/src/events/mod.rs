//! Pre-race conditions and in-race incidents
//!
//! - `pre_race`: one condition per entrant, folded into attributes once
//! - `in_race`: spontaneous incidents on a 60-frame cadence
//! - `chain`: incidents spreading to neighbours within reach

pub mod chain;
pub mod in_race;
pub mod pre_race;

pub use chain::{check_chain_reactions, ChainReaction};
pub use in_race::{ActiveEvent, EventEngine, IncidentKind, IncidentProfile};
pub use pre_race::{
    apply_pre_race_modifiers, generate_pre_race_events, Modifier, PreRaceEvents, PreRaceKind,
};
