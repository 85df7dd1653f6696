//! Race parameters shared between peers
//!
//! A host that draws a seeded race publishes [`RaceParameters`]: the live
//! RNG state after roster and pre-race draws, the drawn time of day, every
//! entrant's effective (post-condition) attributes and odds, and the
//! conditions themselves. A joining peer rebuilds the same waiting race with
//! [`RaceWaiting::from_parameters`] without drawing anything, so both sides
//! consume the remaining stream in lock-step from the first racing tick.
//!
//! Wire format is JSON:
//!
//! ```json
//! {
//!   "race_id": "race-1718000000000-k3x9q2m1a",
//!   "seed": 118472,
//!   "timestamp": 1718000000000,
//!   "time_of_day": "dusk",
//!   "entrants": [{ "ordinal": 1, "name": "Dusty", "base_speed": 0.91, ... }],
//!   "pre_race_events": { "3": "muddy" }
//! }
//! ```

use crate::config::constants::{FIELD_SIZE, LONGSHOT_ODDS, ODDS_BUCKETS};
use crate::core::{EntrantId, SyncError, TimeOfDay};
use crate::entrant::{identity, Entrant, Roster};
use crate::events::{EventEngine, PreRaceEvents, PreRaceKind};
use crate::race::states::RaceData;
use crate::race::{NoticeSink, RaceSettings, RaceWaiting};
use crate::rng::RandomSource;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntrantParameters {
    pub ordinal: u8,
    pub name: String,
    pub base_speed: f64,
    pub stamina: f64,
    pub consistency: f64,
    pub preferred_time: TimeOfDay,
    pub odds: u32,
}

impl From<&Entrant> for EntrantParameters {
    fn from(entrant: &Entrant) -> Self {
        Self {
            ordinal: entrant.id.ordinal(),
            name: entrant.name().to_string(),
            base_speed: entrant.base_speed,
            stamina: entrant.stamina,
            consistency: entrant.consistency,
            preferred_time: entrant.preferred_time,
            odds: entrant.odds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceParameters {
    pub race_id: String,
    /// RNG state to continue from
    pub seed: u64,
    /// Epoch milliseconds at which the host drew the race
    pub timestamp: u64,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    pub entrants: Vec<EntrantParameters>,
    #[serde(default)]
    pub pre_race_events: BTreeMap<EntrantId, PreRaceKind>,
}

impl RaceParameters {
    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `race-{timestamp}-{9 random lowercase alphanumerics}`
///
/// Drawn from the thread RNG, never from the race stream.
pub fn generate_race_id(timestamp: u64) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("race-{timestamp}-{suffix}")
}

impl RaceWaiting {
    /// Parameters a joining peer needs to rebuild this race
    ///
    /// Only seeded races can be shared.
    pub fn parameters(&self) -> Result<RaceParameters, SyncError> {
        let seed = self.seed().ok_or(SyncError::Unseeded)?;
        let timestamp = self.data.created_at_ms;
        Ok(RaceParameters {
            race_id: generate_race_id(timestamp),
            seed,
            timestamp,
            time_of_day: self.roster().time_of_day(),
            entrants: self.roster().iter().map(EntrantParameters::from).collect(),
            pre_race_events: self.pre_race_events().as_map().clone(),
        })
    }

    /// Rebuild a waiting race from a host's parameters
    ///
    /// Consumes no random draws. Attributes are taken as-is: the host
    /// already folded the pre-race conditions into them.
    pub fn from_parameters(params: &RaceParameters, settings: RaceSettings) -> Result<Self, SyncError> {
        if params.entrants.len() != FIELD_SIZE {
            return Err(SyncError::WrongFieldSize {
                expected: FIELD_SIZE,
                got: params.entrants.len(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut entrants = Vec::with_capacity(FIELD_SIZE);
        for p in &params.entrants {
            if p.ordinal == 0 || p.ordinal as usize > FIELD_SIZE {
                return Err(SyncError::OrdinalOutOfRange { ordinal: p.ordinal });
            }
            if !seen.insert(p.ordinal) {
                return Err(SyncError::DuplicateOrdinal { ordinal: p.ordinal });
            }
            validate_attributes(p)?;
            let identity = identity::find(&p.name).ok_or_else(|| SyncError::UnknownIdentity {
                name: p.name.clone(),
            })?;
            entrants.push(Entrant::with_odds(
                EntrantId::new(p.ordinal),
                identity,
                p.base_speed,
                p.stamina,
                p.consistency,
                p.preferred_time,
                p.odds,
            ));
        }

        if let Some(id) = params
            .pre_race_events
            .keys()
            .find(|id| !seen.contains(&id.ordinal()))
        {
            return Err(SyncError::UnknownEventEntrant {
                ordinal: id.ordinal(),
            });
        }

        info!(race_id = %params.race_id, seed = params.seed, "Race rebuilt from parameters");

        Ok(RaceWaiting::from_data(RaceData {
            settings,
            roster: Roster::from_entrants(entrants, params.time_of_day),
            pre_race: PreRaceEvents::already_applied(params.pre_race_events.clone()),
            events: EventEngine::new(),
            rng: RandomSource::seeded(params.seed),
            notices: NoticeSink::default(),
            created_at_ms: params.timestamp,
        }))
    }
}

fn validate_attributes(p: &EntrantParameters) -> Result<(), SyncError> {
    let fields = [
        ("base_speed", p.base_speed),
        ("stamina", p.stamina),
        ("consistency", p.consistency),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(SyncError::InvalidAttribute {
            ordinal: p.ordinal,
            field: *field,
        });
    }
    let known_odds = p.odds == LONGSHOT_ODDS || ODDS_BUCKETS.iter().any(|(_, o)| *o == p.odds);
    if !known_odds {
        return Err(SyncError::InvalidAttribute {
            ordinal: p.ordinal,
            field: "odds",
        });
    }
    Ok(())
}

// ============================================================================
// Desync detection
// ============================================================================

/// Outcome of comparing a local finish order with the authoritative one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The order to settle against; always the authoritative one
    pub order: Vec<EntrantId>,
    pub in_sync: bool,
    /// First rank (0-based) at which the orders differ
    pub first_divergence: Option<usize>,
}

/// Adopt the authoritative finish order, warning if the local race disagrees
///
/// No resimulation is attempted.
pub fn reconcile(local: &[EntrantId], authoritative: &[EntrantId]) -> Reconciliation {
    let first_divergence = local
        .iter()
        .zip(authoritative)
        .position(|(a, b)| a != b)
        .or_else(|| (local.len() != authoritative.len()).then(|| local.len().min(authoritative.len())));

    if let Some(rank) = first_divergence {
        warn!(
            rank = rank + 1,
            local_winner = ?local.first(),
            authoritative_winner = ?authoritative.first(),
            "Race desync: adopting authoritative finish order"
        );
    }

    Reconciliation {
        order: authoritative.to_vec(),
        in_sync: first_divergence.is_none(),
        first_divergence,
    }
}
