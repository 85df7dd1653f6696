//! Recommended Strategy
//!
//! Follows an external advisor. For every advised entrant the strategy
//! places each exotic kind the advisor suggests for it, or a plain win bet
//! when none is suggested. Exotic picks start with the advised entrant,
//! continue with the other advised entrants and are topped up from the
//! card in card order.
//!
//! When the advisor names nobody on the card the race is handed to
//! [`Conservative`].

use crate::conservative::Conservative;
use plume_core::engine::{BetIntent, RaceCard, Strategy};
use plume_core::{BetKind, EntrantId, ExoticKind};
use tracing::debug;

/// Advice for one entrant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub entrant: EntrantId,
    /// Exotic kinds to back with this entrant leading the picks
    pub exotics: Vec<ExoticKind>,
}

impl Recommendation {
    pub fn win(entrant: EntrantId) -> Self {
        Self {
            entrant,
            exotics: Vec::new(),
        }
    }

    pub fn with_exotics(entrant: EntrantId, exotics: &[ExoticKind]) -> Self {
        Self {
            entrant,
            exotics: exotics.to_vec(),
        }
    }
}

/// Source of advice for a waiting race
pub trait RecommendationFeed {
    fn recommend(&mut self, card: &RaceCard) -> Vec<Recommendation>;
}

/// Feed that never has advice
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecommendations;

impl RecommendationFeed for NoRecommendations {
    fn recommend(&mut self, _card: &RaceCard) -> Vec<Recommendation> {
        Vec::new()
    }
}

/// Feed that gives the same advice for every race
#[derive(Debug, Clone, Default)]
pub struct FixedFeed {
    advice: Vec<Recommendation>,
}

impl FixedFeed {
    pub fn new(advice: Vec<Recommendation>) -> Self {
        Self { advice }
    }
}

impl RecommendationFeed for FixedFeed {
    fn recommend(&mut self, _card: &RaceCard) -> Vec<Recommendation> {
        self.advice.clone()
    }
}

pub struct Recommended<F: RecommendationFeed> {
    feed: F,
    fallback: Conservative,
    /// Advised entrants on the last planned card, first mention order
    last: Vec<EntrantId>,
}

impl<F: RecommendationFeed> Recommended<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            fallback: Conservative::new(),
            last: Vec::new(),
        }
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }

    /// `lead`, then the other advised entrants, then the rest of the card
    fn fill_picks(&self, card: &RaceCard, lead: EntrantId, kind: ExoticKind) -> Option<Vec<EntrantId>> {
        let mut picks = vec![lead];
        let candidates = self.last.iter().copied().chain(card.ids());
        for candidate in candidates {
            if picks.len() == kind.pick_count() {
                break;
            }
            if !picks.contains(&candidate) {
                picks.push(candidate);
            }
        }
        (picks.len() == kind.pick_count()).then_some(picks)
    }
}

impl<F: RecommendationFeed> Strategy for Recommended<F> {
    fn plan(&mut self, card: &RaceCard) -> Vec<BetIntent> {
        let advice: Vec<Recommendation> = self
            .feed
            .recommend(card)
            .into_iter()
            .filter(|r| card.get(r.entrant).is_some())
            .collect();

        self.last.clear();
        for r in &advice {
            if !self.last.contains(&r.entrant) {
                self.last.push(r.entrant);
            }
        }

        if self.last.is_empty() {
            debug!("No advice for this card, using conservative plan");
            return self.fallback.plan(card);
        }

        let mut intents = Vec::new();
        for r in &advice {
            if r.exotics.is_empty() {
                intents.push(BetIntent::Simple {
                    entrant: r.entrant,
                    kind: BetKind::Win,
                });
                continue;
            }
            for kind in &r.exotics {
                match self.fill_picks(card, r.entrant, *kind) {
                    Some(picks) => intents.push(BetIntent::Exotic { kind: *kind, picks }),
                    None => debug!(kind = kind.as_str(), entrant = %r.entrant, "Not enough entrants for picks"),
                }
            }
        }
        intents
    }

    fn name(&self) -> &'static str {
        "Recommended"
    }

    fn recommendations(&self) -> &[EntrantId] {
        &self.last
    }

    fn reset(&mut self) {
        self.last.clear();
    }
}
