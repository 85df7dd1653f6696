//! Identifiers and tagged kinds shared by every module
//!
//! All types here are `Copy` and serialize to stable lowercase names, since
//! they appear in race-parameter packets exchanged between peers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal of an entrant within a race, 1..=8
///
/// The ordinal doubles as the lane: entrant 1 runs in lane 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntrantId(pub u8);

impl EntrantId {
    #[inline(always)]
    pub const fn new(ordinal: u8) -> Self {
        Self(ordinal)
    }

    #[inline(always)]
    pub const fn ordinal(&self) -> u8 {
        self.0
    }

    /// Zero-based lane index
    #[inline(always)]
    pub const fn lane(&self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u8> for EntrantId {
    #[inline(always)]
    fn from(ordinal: u8) -> Self {
        Self(ordinal)
    }
}

/// Period of the day, in cyclic order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Night,
    Dawn,
    Morning,
    Day,
    Afternoon,
    Dusk,
    Evening,
}

impl TimeOfDay {
    /// Cyclic order; preferred-time draws index into this table
    pub const ALL: [TimeOfDay; 7] = [
        TimeOfDay::Night,
        TimeOfDay::Dawn,
        TimeOfDay::Morning,
        TimeOfDay::Day,
        TimeOfDay::Afternoon,
        TimeOfDay::Dusk,
        TimeOfDay::Evening,
    ];

    /// Position in the cycle
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Period for a wall-clock hour (values past 23 wrap)
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            0..=4 => TimeOfDay::Night,
            5..=6 => TimeOfDay::Dawn,
            7..=9 => TimeOfDay::Morning,
            10..=15 => TimeOfDay::Day,
            16..=17 => TimeOfDay::Afternoon,
            18..=19 => TimeOfDay::Dusk,
            _ => TimeOfDay::Evening,
        }
    }

    /// Cyclic step distance, 0..=3
    pub fn distance(&self, other: TimeOfDay) -> usize {
        let d = self.index().abs_diff(other.index());
        d.min(Self::ALL.len() - d)
    }

    /// Whether the two periods form one of the opposite pairs
    pub fn is_opposite(&self, other: TimeOfDay) -> bool {
        use TimeOfDay::*;
        matches!(
            (*self, other),
            (Night, Day)
                | (Day, Night)
                | (Dawn, Dusk)
                | (Dusk, Dawn)
                | (Morning, Evening)
                | (Evening, Morning)
                | (Afternoon, Night)
                | (Night, Afternoon)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "night",
            TimeOfDay::Dawn => "dawn",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Day => "day",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Dusk => "dusk",
            TimeOfDay::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Simple bet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    Win,
    Place,
    Show,
}

impl BetKind {
    pub const ALL: [BetKind; 3] = [BetKind::Win, BetKind::Place, BetKind::Show];

    /// Worst finishing rank that still pays
    #[inline]
    pub fn paying_rank(&self) -> u8 {
        match self {
            BetKind::Win => 1,
            BetKind::Place => 2,
            BetKind::Show => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BetKind::Win => "win",
            BetKind::Place => "place",
            BetKind::Show => "show",
        }
    }
}

impl fmt::Display for BetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exotic bet kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExoticKind {
    Exacta,
    Trifecta,
    Superfecta,
    Quinella,
}

impl ExoticKind {
    pub const ALL: [ExoticKind; 4] = [
        ExoticKind::Exacta,
        ExoticKind::Trifecta,
        ExoticKind::Superfecta,
        ExoticKind::Quinella,
    ];

    /// Number of picks the bet requires
    #[inline]
    pub fn pick_count(&self) -> usize {
        match self {
            ExoticKind::Exacta | ExoticKind::Quinella => 2,
            ExoticKind::Trifecta => 3,
            ExoticKind::Superfecta => 4,
        }
    }

    /// Fixed payout multiplier
    #[inline]
    pub fn multiplier(&self) -> u32 {
        use crate::config::constants::*;
        match self {
            ExoticKind::Exacta => EXACTA_MULTIPLIER,
            ExoticKind::Trifecta => TRIFECTA_MULTIPLIER,
            ExoticKind::Superfecta => SUPERFECTA_MULTIPLIER,
            ExoticKind::Quinella => QUINELLA_MULTIPLIER,
        }
    }

    /// Picks match as a set rather than in order
    #[inline]
    pub fn is_unordered(&self) -> bool {
        matches!(self, ExoticKind::Quinella)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExoticKind::Exacta => "exacta",
            ExoticKind::Trifecta => "trifecta",
            ExoticKind::Superfecta => "superfecta",
            ExoticKind::Quinella => "quinella",
        }
    }
}

impl fmt::Display for ExoticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any bet kind, used for per-kind bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnyBetKind {
    Simple(BetKind),
    Exotic(ExoticKind),
}

impl fmt::Display for AnyBetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyBetKind::Simple(k) => k.fmt(f),
            AnyBetKind::Exotic(k) => k.fmt(f),
        }
    }
}

impl From<BetKind> for AnyBetKind {
    fn from(k: BetKind) -> Self {
        AnyBetKind::Simple(k)
    }
}

impl From<ExoticKind> for AnyBetKind {
    fn from(k: ExoticKind) -> Self {
        AnyBetKind::Exotic(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrant_lane() {
        assert_eq!(EntrantId::new(1).lane(), 0);
        assert_eq!(EntrantId::new(8).lane(), 7);
        assert_eq!(EntrantId::new(3).to_string(), "#3");
    }

    #[test]
    fn test_time_of_day_from_hour() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::from_hour(9), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(19), TimeOfDay::Dusk);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn test_cyclic_distance() {
        assert_eq!(TimeOfDay::Night.distance(TimeOfDay::Night), 0);
        assert_eq!(TimeOfDay::Night.distance(TimeOfDay::Evening), 1);
        assert_eq!(TimeOfDay::Night.distance(TimeOfDay::Dusk), 2);
        assert_eq!(TimeOfDay::Dawn.distance(TimeOfDay::Afternoon), 3);
    }

    #[test]
    fn test_opposites_are_symmetric() {
        for a in TimeOfDay::ALL {
            for b in TimeOfDay::ALL {
                assert_eq!(a.is_opposite(b), b.is_opposite(a));
            }
        }
        assert!(TimeOfDay::Afternoon.is_opposite(TimeOfDay::Night));
        assert!(!TimeOfDay::Day.is_opposite(TimeOfDay::Dusk));
    }

    #[test]
    fn test_exotic_pick_counts() {
        assert_eq!(ExoticKind::Exacta.pick_count(), 2);
        assert_eq!(ExoticKind::Trifecta.pick_count(), 3);
        assert_eq!(ExoticKind::Superfecta.pick_count(), 4);
        assert_eq!(ExoticKind::Quinella.pick_count(), 2);
        assert_eq!(ExoticKind::Superfecta.multiplier(), 200);
    }

    #[test]
    fn test_kinds_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&TimeOfDay::Dusk).unwrap(), "\"dusk\"");
        assert_eq!(serde_json::to_string(&BetKind::Show).unwrap(), "\"show\"");
        assert_eq!(
            serde_json::to_string(&AnyBetKind::from(ExoticKind::Quinella)).unwrap(),
            "\"quinella\""
        );
    }
}
