//! Conservative Strategy
//!
//! Rule-based betting from the race card alone. Entrants are ranked by
//! odds adjusted for their pre-race condition, severe conditions are left
//! out entirely, and exotic bets are only placed when the top of the
//! adjusted field is short-priced.
//!
//! ## Plan
//!
//! 1. Effective odds = `max(0.1, odds − impact × 10)`, stable-sorted ascending
//! 2. Drop Sick and Tired entrants
//! 3. Win on the first viable entrant, place on the second, stopping at
//!    the first one priced above 8-1
//! 4. Superfecta on the top four, or else trifecta on the top three, when
//!    the ladder of odds is tight enough
//! 5. Exacta on the top two when short, else quinella on the same pair

use plume_core::engine::{BetIntent, CardEntry, RaceCard, Strategy};
use plume_core::events::PreRaceKind;
use plume_core::{BetKind, ExoticKind};
use tracing::debug;

// ===== CONFIGURATION =====

/// Simple bets per race
pub const MAX_SIMPLE_BETS: usize = 2;

/// No simple bet on anything priced above this
pub const MAX_SIMPLE_ODDS: u32 = 8;

/// Floor for adjusted odds
pub const MIN_EFFECTIVE_ODDS: f64 = 0.1;

/// Scale applied to a condition's impact when adjusting odds
pub const IMPACT_SCALE: f64 = 10.0;

/// Per-position odds ceilings, favourite first
pub const SUPERFECTA_LADDER: [f64; 4] = [2.0, 3.0, 4.0, 6.0];
pub const TRIFECTA_LADDER: [f64; 3] = [2.5, 4.0, 5.0];
pub const EXACTA_LADDER: [f64; 2] = [4.0, 6.0];
pub const QUINELLA_LADDER: [f64; 2] = [6.0, 7.0];

/// How much a condition helps (positive) or hurts (negative) an entrant
pub fn condition_impact(kind: PreRaceKind) -> f64 {
    match kind {
        PreRaceKind::Sick => -0.35,
        PreRaceKind::Tired => -0.25,
        PreRaceKind::Muddy => -0.15,
        PreRaceKind::Nervous => -0.05,
        PreRaceKind::Energized => 0.10,
    }
}

/// Odds adjusted for the entrant's condition
pub fn effective_odds(entry: &CardEntry) -> f64 {
    let impact = entry.condition.map_or(0.0, condition_impact);
    (entry.odds as f64 - impact * IMPACT_SCALE).max(MIN_EFFECTIVE_ODDS)
}

fn within(ladder: &[f64], entries: &[&CardEntry]) -> bool {
    entries.len() >= ladder.len()
        && ladder
            .iter()
            .zip(entries)
            .all(|(ceiling, entry)| entry.odds as f64 <= *ceiling)
}

fn picks(entries: &[&CardEntry], n: usize) -> Vec<plume_core::EntrantId> {
    entries.iter().take(n).map(|e| e.id).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Conservative;

impl Conservative {
    pub fn new() -> Self {
        Self
    }

    /// Viable entrants ordered by effective odds, card order on ties
    pub fn ranked<'a>(&self, card: &'a RaceCard) -> Vec<&'a CardEntry> {
        let mut ranked: Vec<(&CardEntry, f64)> =
            card.entries.iter().map(|e| (e, effective_odds(e))).collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
            .into_iter()
            .map(|(e, _)| e)
            .filter(|e| !e.condition.map_or(false, |c| c.is_severe()))
            .collect()
    }
}

impl Strategy for Conservative {
    fn plan(&mut self, card: &RaceCard) -> Vec<BetIntent> {
        let viable = self.ranked(card);
        if viable.is_empty() {
            debug!("No viable entrants");
            return Vec::new();
        }

        let mut intents = Vec::new();

        for (i, entry) in viable.iter().take(MAX_SIMPLE_BETS).enumerate() {
            if entry.odds > MAX_SIMPLE_ODDS {
                break;
            }
            let kind = if i == 0 { BetKind::Win } else { BetKind::Place };
            intents.push(BetIntent::Simple {
                entrant: entry.id,
                kind,
            });
        }

        if within(&SUPERFECTA_LADDER, &viable) {
            intents.push(BetIntent::Exotic {
                kind: ExoticKind::Superfecta,
                picks: picks(&viable, 4),
            });
        } else if within(&TRIFECTA_LADDER, &viable) {
            intents.push(BetIntent::Exotic {
                kind: ExoticKind::Trifecta,
                picks: picks(&viable, 3),
            });
        }

        let exacta = within(&EXACTA_LADDER, &viable);
        if exacta {
            intents.push(BetIntent::Exotic {
                kind: ExoticKind::Exacta,
                picks: picks(&viable, 2),
            });
        }
        // An exacta on the pair already covers the quinella
        if !exacta && within(&QUINELLA_LADDER, &viable) {
            intents.push(BetIntent::Exotic {
                kind: ExoticKind::Quinella,
                picks: picks(&viable, 2),
            });
        }

        debug!(bets = intents.len(), "Conservative plan");
        intents
    }

    fn name(&self) -> &'static str {
        "Conservative"
    }
}
