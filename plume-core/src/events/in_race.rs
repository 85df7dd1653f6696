//! In-race incidents
//!
//! | kind         | speed × | duration | position | chains at | per-frame p |
//! |--------------|---------|----------|----------|-----------|-------------|
//! | Trip         | 0.85    | 200 ms   | −0.003   | 0.08      | 0.0003      |
//! | SpinOut      | 0.70    | 400 ms   | −0.005   | 0.10      | 0.0002      |
//! | BurstOfSpeed | 1.05    | 500 ms   | +0.005   | never     | 0.001       |
//! | Stumble      | 0.90    | 200 ms   | −0.002   | 0.05      | 0.0005      |
//!
//! Spontaneous incidents are only rolled on one frame in sixty and the
//! per-frame probability is scaled up by the same factor. A spin-out has a
//! 15% chance to throw the entrant forward instead of holding it back.

use crate::config::constants::*;
use crate::core::EntrantId;
use crate::entrant::Entrant;
use crate::rng::RaceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PROPEL_FORWARD_CHANCE: f64 = 0.15;
const PROPEL_POSITION_GAIN: f64 = 0.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentKind {
    Trip,
    SpinOut,
    BurstOfSpeed,
    Stumble,
}

/// Static effect table of one incident kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentProfile {
    pub speed_multiplier: f64,
    pub duration_ms: f64,
    pub position_delta: f64,
    /// `None` when the incident never spreads
    pub chain_probability: Option<f64>,
    /// Per-frame probability before cadence scaling
    pub probability: f64,
}

impl IncidentKind {
    /// Roll order
    pub const ALL: [IncidentKind; 4] = [
        IncidentKind::Trip,
        IncidentKind::SpinOut,
        IncidentKind::BurstOfSpeed,
        IncidentKind::Stumble,
    ];

    pub fn profile(&self) -> IncidentProfile {
        match self {
            IncidentKind::Trip => IncidentProfile {
                speed_multiplier: 0.85,
                duration_ms: 200.0,
                position_delta: -0.003,
                chain_probability: Some(0.08),
                probability: 0.0003,
            },
            IncidentKind::SpinOut => IncidentProfile {
                speed_multiplier: 0.70,
                duration_ms: 400.0,
                position_delta: -0.005,
                chain_probability: Some(0.10),
                probability: 0.0002,
            },
            IncidentKind::BurstOfSpeed => IncidentProfile {
                speed_multiplier: 1.05,
                duration_ms: 500.0,
                position_delta: 0.005,
                chain_probability: None,
                probability: 0.001,
            },
            IncidentKind::Stumble => IncidentProfile {
                speed_multiplier: 0.90,
                duration_ms: 200.0,
                position_delta: -0.002,
                chain_probability: Some(0.05),
                probability: 0.0005,
            },
        }
    }

    pub fn is_adverse(&self) -> bool {
        !matches!(self, IncidentKind::BurstOfSpeed)
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentKind::Trip => "Trip",
            IncidentKind::SpinOut => "Spin Out",
            IncidentKind::BurstOfSpeed => "Burst of Speed",
            IncidentKind::Stumble => "Stumble",
        }
    }
}

/// An incident currently affecting one entrant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEvent {
    pub entrant: EntrantId,
    pub kind: IncidentKind,
    pub started_at_ms: f64,
    /// Spin-out that threw the entrant forward
    pub propelled: bool,
    /// Entrant whose incident caused this one
    pub chained_from: Option<EntrantId>,
}

impl ActiveEvent {
    pub fn is_expired(&self, clock_ms: f64) -> bool {
        clock_ms - self.started_at_ms >= self.kind.profile().duration_ms
    }

    /// Chain probability, `None` for propelled spin-outs and bursts
    pub fn chain_probability(&self) -> Option<f64> {
        if self.propelled {
            return None;
        }
        self.kind.profile().chain_probability
    }

    /// Speed multiplier after severity scaling
    ///
    /// Adverse multipliers move toward 1.0 for resilient entrants.
    pub fn speed_multiplier(&self, severity: f64) -> f64 {
        if self.propelled {
            return 1.0;
        }
        let m = self.kind.profile().speed_multiplier;
        if self.kind.is_adverse() {
            1.0 - (1.0 - m) * severity
        } else {
            m
        }
    }

    /// One-shot position change applied when the incident starts
    pub fn position_delta(&self, severity: f64) -> f64 {
        if self.propelled {
            return PROPEL_POSITION_GAIN;
        }
        let d = self.kind.profile().position_delta;
        if self.kind.is_adverse() {
            d * severity
        } else {
            d
        }
    }
}

/// Active incidents keyed by entrant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventEngine {
    active: BTreeMap<EntrantId, ActiveEvent>,
}

impl EventEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self, id: EntrantId) -> Option<&ActiveEvent> {
        self.active.get(&id)
    }

    pub fn has_active(&self, id: EntrantId) -> bool {
        self.active.contains_key(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEvent> {
        self.active.values()
    }

    /// Remove every incident whose duration has elapsed
    pub fn expire(&mut self, clock_ms: f64) -> usize {
        let before = self.active.len();
        self.active.retain(|_, e| !e.is_expired(clock_ms));
        before - self.active.len()
    }

    /// Roll a spontaneous incident for one entrant
    ///
    /// Returns the new incident, already registered as active. No draw is
    /// consumed when the entrant is ineligible or the frame is off-cadence.
    pub fn check_for_event<R: RaceRandom>(
        &mut self,
        entrant: &Entrant,
        clock_ms: f64,
        rng: &mut R,
    ) -> Option<ActiveEvent> {
        if entrant.is_finished() || entrant.position() >= EVENT_FREE_ZONE {
            return None;
        }
        if self.has_active(entrant.id) || self.active.len() >= MAX_CONCURRENT_EVENTS {
            return None;
        }
        if !is_check_frame(clock_ms) {
            return None;
        }

        for kind in IncidentKind::ALL {
            if rng.next() < kind.profile().probability * EVENT_CHECK_STRIDE as f64 {
                let propelled = kind == IncidentKind::SpinOut && rng.next() < PROPEL_FORWARD_CHANCE;
                let event = ActiveEvent {
                    entrant: entrant.id,
                    kind,
                    started_at_ms: clock_ms,
                    propelled,
                    chained_from: None,
                };
                self.active.insert(entrant.id, event);
                return Some(event);
            }
        }
        None
    }

    /// Register an incident caused by a neighbour; bypasses the field-wide cap
    ///
    /// Returns `None` if the target already has an incident.
    pub fn start_chained(
        &mut self,
        entrant: EntrantId,
        kind: IncidentKind,
        source: EntrantId,
        clock_ms: f64,
    ) -> Option<ActiveEvent> {
        if self.has_active(entrant) {
            return None;
        }
        let event = ActiveEvent {
            entrant,
            kind,
            started_at_ms: clock_ms,
            propelled: false,
            chained_from: Some(source),
        };
        self.active.insert(entrant, event);
        Some(event)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

/// `floor(clock / 16) % 60 == 0`
#[inline]
pub fn is_check_frame(clock_ms: f64) -> bool {
    if clock_ms < 0.0 {
        return false;
    }
    ((clock_ms / EVENT_FRAME_MS).floor() as u64) % EVENT_CHECK_STRIDE == 0
}
