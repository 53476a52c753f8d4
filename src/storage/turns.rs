// src/storage/turns.rs — Prior-turn record file (last-turn.json)
//
// One record per project, replaced every turn. Missing, corrupt and stale
// records all read as "no context".

use chrono::{DateTime, Duration, Utc};
use std::path::{Path, PathBuf};

use super::write_json_atomic;
use crate::detector::PriorTurnRecord;
use crate::infra::errors::RulecatchError;

pub struct TurnStore {
    path: PathBuf,
}

impl TurnStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw read, without a freshness check.
    pub fn load(&self) -> Option<PriorTurnRecord> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Ignoring corrupt prior-turn record {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// The record if it exists and is within `window` of `now`.
    pub fn load_fresh(&self, now: DateTime<Utc>, window: Duration) -> Option<PriorTurnRecord> {
        self.load().filter(|r| r.is_fresh(now, window))
    }

    /// Replace the stored record (latest turn wins).
    pub fn save(&self, record: &PriorTurnRecord) -> Result<(), RulecatchError> {
        write_json_atomic(&self.path, record)
    }

    /// Delete the record if it is stale or unreadable. Returns whether it was removed.
    pub fn remove_if_stale(&self, now: DateTime<Utc>, window: Duration) -> Result<bool, RulecatchError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let keep = self.load().is_some_and(|r| r.is_fresh(now, window));
        if keep {
            return Ok(false);
        }
        std::fs::remove_file(&self.path)?;
        Ok(true)
    }
}
