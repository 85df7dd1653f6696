//! Pre-race conditions
//!
//! Each entrant rolls every kind in declaration order and keeps the first
//! one that hits, so an entrant carries at most one condition. The
//! modifiers are multiplied into the attributes exactly once, after odds
//! have been set.

use crate::core::EntrantId;
use crate::entrant::Roster;
use crate::rng::RaceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Fractional attribute changes, applied as `attr *= 1 + delta`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Modifier {
    pub speed: f64,
    pub stamina: f64,
    pub consistency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreRaceKind {
    Sick,
    Tired,
    Muddy,
    Energized,
    Nervous,
}

impl PreRaceKind {
    /// Roll order
    pub const ALL: [PreRaceKind; 5] = [
        PreRaceKind::Sick,
        PreRaceKind::Tired,
        PreRaceKind::Muddy,
        PreRaceKind::Energized,
        PreRaceKind::Nervous,
    ];

    pub fn probability(&self) -> f64 {
        match self {
            PreRaceKind::Sick => 0.05,
            PreRaceKind::Tired => 0.05,
            PreRaceKind::Muddy => 0.06,
            PreRaceKind::Energized => 0.03,
            PreRaceKind::Nervous => 0.05,
        }
    }

    pub fn modifier(&self) -> Modifier {
        match self {
            PreRaceKind::Sick => Modifier {
                speed: -0.20,
                stamina: -0.15,
                consistency: 0.0,
            },
            PreRaceKind::Tired => Modifier {
                speed: -0.15,
                stamina: -0.10,
                consistency: 0.0,
            },
            PreRaceKind::Muddy => Modifier {
                speed: -0.10,
                stamina: 0.0,
                consistency: -0.05,
            },
            PreRaceKind::Energized => Modifier {
                speed: 0.10,
                ..Modifier::default()
            },
            PreRaceKind::Nervous => Modifier {
                consistency: -0.05,
                ..Modifier::default()
            },
        }
    }

    /// Severe conditions rule the entrant out for cautious bettors
    pub fn is_severe(&self) -> bool {
        matches!(self, PreRaceKind::Sick | PreRaceKind::Tired)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PreRaceKind::Sick => "Sick",
            PreRaceKind::Tired => "Tired",
            PreRaceKind::Muddy => "Muddy",
            PreRaceKind::Energized => "Energized",
            PreRaceKind::Nervous => "Nervous",
        }
    }
}

/// Conditions drawn for one race
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreRaceEvents {
    events: BTreeMap<EntrantId, PreRaceKind>,
    applied: bool,
}

impl PreRaceEvents {
    /// Conditions received from a peer; their effect is already folded into
    /// the shared attributes, so they count as applied.
    pub fn already_applied(events: BTreeMap<EntrantId, PreRaceKind>) -> Self {
        Self {
            events,
            applied: true,
        }
    }

    pub fn get(&self, id: EntrantId) -> Option<PreRaceKind> {
        self.events.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntrantId, PreRaceKind)> + '_ {
        self.events.iter().map(|(id, kind)| (*id, *kind))
    }

    pub fn as_map(&self) -> &BTreeMap<EntrantId, PreRaceKind> {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }
}

/// Roll conditions for every entrant, in ordinal order
pub fn generate_pre_race_events<R: RaceRandom>(roster: &Roster, rng: &mut R) -> PreRaceEvents {
    let mut events = BTreeMap::new();
    for entrant in roster.iter() {
        for kind in PreRaceKind::ALL {
            if rng.next() < kind.probability() {
                debug!(entrant = %entrant.id, condition = kind.label(), "Pre-race condition");
                events.insert(entrant.id, kind);
                break;
            }
        }
    }
    PreRaceEvents {
        events,
        applied: false,
    }
}

/// Fold conditions into the attributes; a second call is a no-op
pub fn apply_pre_race_modifiers(events: &mut PreRaceEvents, roster: &mut Roster) {
    if events.applied {
        return;
    }
    for (id, kind) in events.events.iter() {
        if let Some(entrant) = roster.get_mut(*id) {
            let m = kind.modifier();
            entrant.base_speed *= 1.0 + m.speed;
            entrant.stamina *= 1.0 + m.stamina;
            entrant.consistency *= 1.0 + m.consistency;
            entrant.progress.current_speed = entrant.base_speed;
        }
    }
    events.applied = true;
}
