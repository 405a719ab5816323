//! Versioned save format handed to the persistence layer.
//!
//! The session never decides when to save. It produces a [`Snapshot`] on
//! request and can be rebuilt from one; storage is someone else's problem.

use super::constants::SNAPSHOT_VERSION;
use super::game_state::GameState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("snapshot has no version field")]
    MissingVersion,
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u64, expected: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub state: GameState,
}

impl Snapshot {
    pub fn new(state: GameState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            state,
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a snapshot, checking the version before touching the state.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let value: Value = serde_json::from_str(json).inspect_err(|e| {
            tracing::warn!(error = %e, "snapshot is not JSON");
        })?;
        let found = value
            .get("version")
            .and_then(Value::as_u64)
            .ok_or(SnapshotError::MissingVersion)?;
        if found != SNAPSHOT_VERSION as u64 {
            tracing::warn!(found, expected = SNAPSHOT_VERSION, "snapshot version mismatch");
            return Err(SnapshotError::UnsupportedVersion {
                found,
                expected: SNAPSHOT_VERSION,
            });
        }
        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(error = %e, "snapshot state failed to decode");
            SnapshotError::Json(e)
        })
    }
}
