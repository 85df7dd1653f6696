//! Race notices for announcers and other listeners
//!
//! Notices travel over a bounded crossbeam channel. The race never blocks on
//! a slow listener: when the buffer is full the notice is dropped and a
//! warning is logged.

use crate::core::EntrantId;
use crate::events::IncidentKind;
use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum RaceNotice {
    RaceStarted,
    Winner {
        entrant: EntrantId,
    },
    LeadChange {
        leader: EntrantId,
    },
    Incident {
        entrant: EntrantId,
        kind: IncidentKind,
    },
    ChainReaction {
        entrant: EntrantId,
        kind: IncidentKind,
        source: EntrantId,
    },
}

impl RaceNotice {
    /// Entrant the notice is about
    pub fn entrant(&self) -> Option<EntrantId> {
        match self {
            RaceNotice::RaceStarted => None,
            RaceNotice::Winner { entrant } => Some(*entrant),
            RaceNotice::LeadChange { leader } => Some(*leader),
            RaceNotice::Incident { entrant, .. } => Some(*entrant),
            RaceNotice::ChainReaction { entrant, .. } => Some(*entrant),
        }
    }

    /// Short spoken form
    pub fn label(&self) -> String {
        match self {
            RaceNotice::RaceStarted => "And they're off!".to_string(),
            RaceNotice::Winner { entrant } => format!("Number {} wins!", entrant.ordinal()),
            RaceNotice::LeadChange { leader } => {
                format!("Number {} takes the lead", leader.ordinal())
            }
            RaceNotice::Incident { entrant, kind } => {
                format!("{} for number {}", kind.label(), entrant.ordinal())
            }
            RaceNotice::ChainReaction {
                entrant,
                kind,
                source,
            } => format!(
                "Number {} takes down number {} with a {}",
                source.ordinal(),
                entrant.ordinal(),
                kind.label().to_lowercase()
            ),
        }
    }
}

/// Sending half owned by the race
#[derive(Debug, Clone, Default)]
pub struct NoticeSink {
    sender: Option<Sender<RaceNotice>>,
}

impl NoticeSink {
    /// Create a sink and its receiving half
    pub fn channel(capacity: usize) -> (Self, Receiver<RaceNotice>) {
        let (sender, receiver) = bounded(capacity.max(1));
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    pub fn is_attached(&self) -> bool {
        self.sender.is_some()
    }

    pub fn emit(&mut self, notice: RaceNotice) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(notice) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                warn!("Notice buffer full, dropping {:?}", dropped);
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!("Notice listener gone, detaching sink");
                self.sender = None;
            }
        }
    }
}
