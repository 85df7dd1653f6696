//! Read-only snapshots for renderers

use crate::core::EntrantId;
use crate::entrant::Roster;
use crate::events::{EventEngine, IncidentKind, PreRaceEvents, PreRaceKind};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RacePhase {
    Waiting,
    Counting,
    Racing,
    Finished,
}

impl RacePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RacePhase::Waiting => "waiting",
            RacePhase::Counting => "counting",
            RacePhase::Racing => "racing",
            RacePhase::Finished => "finished",
        }
    }
}

impl fmt::Display for RacePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrantFrame {
    pub id: EntrantId,
    pub name: &'static str,
    pub color: &'static str,
    pub lane: usize,
    pub position: f64,
    pub current_speed: f64,
    pub finished: bool,
    pub finish_rank: Option<u8>,
    pub incident: Option<IncidentKind>,
    pub condition: Option<PreRaceKind>,
}

/// State of the whole field at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceFrame {
    pub phase: RacePhase,
    pub clock_ms: f64,
    /// Countdown ticks left, only while counting
    pub countdown: Option<u32>,
    pub leader: Option<EntrantId>,
    pub entrants: Vec<EntrantFrame>,
}

impl RaceFrame {
    pub(crate) fn capture(
        phase: RacePhase,
        clock_ms: f64,
        countdown: Option<u32>,
        roster: &Roster,
        events: &EventEngine,
        pre_race: &PreRaceEvents,
    ) -> Self {
        let entrants = roster
            .iter()
            .map(|e| EntrantFrame {
                id: e.id,
                name: e.name(),
                color: e.identity.livery.color,
                lane: e.id.lane(),
                position: e.position(),
                current_speed: e.progress.current_speed,
                finished: e.is_finished(),
                finish_rank: e.progress.finish_rank,
                incident: events.active(e.id).map(|ev| ev.kind),
                condition: pre_race.get(e.id),
            })
            .collect();

        let leader = match phase {
            RacePhase::Racing => roster.leader(),
            RacePhase::Finished => roster
                .iter()
                .find(|e| e.progress.finish_rank == Some(1))
                .map(|e| e.id),
            RacePhase::Waiting | RacePhase::Counting => None,
        };

        Self {
            phase,
            clock_ms,
            countdown,
            leader,
            entrants,
        }
    }

    pub fn entrant(&self, id: EntrantId) -> Option<&EntrantFrame> {
        self.entrants.iter().find(|e| e.id == id)
    }
}
