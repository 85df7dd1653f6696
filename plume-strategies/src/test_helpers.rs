//! Test helpers for building race cards by hand

#[cfg(test)]
use plume_core::engine::{CardEntry, RaceCard};
#[cfg(test)]
use plume_core::events::PreRaceKind;
#[cfg(test)]
use plume_core::{EntrantId, TimeOfDay};
#[cfg(test)]
use rust_decimal_macros::dec;

/// Card with the given odds for entrants 1..=n, no conditions
#[cfg(test)]
pub fn card_with_odds(odds: &[u32]) -> RaceCard {
    card_with(odds, &[])
}

/// Card with odds and a condition on some entrants
#[cfg(test)]
pub fn card_with(odds: &[u32], conditions: &[(u8, PreRaceKind)]) -> RaceCard {
    let entries = odds
        .iter()
        .enumerate()
        .map(|(i, odds)| {
            let id = EntrantId::new(i as u8 + 1);
            CardEntry {
                id,
                name: plume_core::entrant::IDENTITY_POOL[i].name,
                odds: *odds,
                preferred_time: TimeOfDay::Day,
                condition: conditions
                    .iter()
                    .find(|(n, _)| *n == id.ordinal())
                    .map(|(_, k)| *k),
            }
        })
        .collect();
    RaceCard {
        time_of_day: Some(TimeOfDay::Day),
        entries,
        stake: dec!(1000000),
        bankroll: dec!(10000000),
    }
}
