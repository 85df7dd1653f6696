//! Session persistence
//!
//! The player's bankroll and stats live in one JSON file. Saves go to a
//! sibling temp file first and are renamed over the old one.

use anyhow::{Context, Result};
use plume_core::config::WagerConfig;
use plume_core::{Session, SessionSnapshot};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved snapshot, or `None` if nothing has been saved yet
    pub fn load_snapshot(&self) -> Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session {}", self.path.display()))?;
        let snapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse session {}", self.path.display()))?;
        Ok(Some(snapshot))
    }

    /// Resume the saved session, or start a fresh one
    pub fn load(&self, config: &WagerConfig) -> Result<Session> {
        match self.load_snapshot()? {
            Some(snapshot) => {
                info!(path = %self.path.display(), bankroll = %snapshot.bankroll, "Resuming session");
                Ok(Session::from_snapshot(snapshot, config))
            }
            None => {
                info!(path = %self.path.display(), "Starting new session");
                Ok(Session::new(config))
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("Failed to serialize session")?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        info!(path = %self.path.display(), bankroll = %session.bankroll(), "Session saved");
        Ok(())
    }
}
