//! Whole-state backup files: export envelope and validated import.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::model::{GridSnapshot, GridState};

pub const BACKUP_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Downloadable backup: `{ "version": 1, "timestamp": "<ISO-8601>", "state": { … } }`.
pub struct BackupEnvelope {
    pub version: u32,
    pub timestamp: String,
    pub state: GridSnapshot,
}

impl BackupEnvelope {
    /// Pretty-printed JSON text for the backup file.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot cannot be serialized.
    pub fn to_json(&self) -> Result<String, BackupError> {
        serde_json::to_string_pretty(self).map_err(|e| BackupError::Encode(e.to_string()))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a backup cannot be produced or applied.
pub enum BackupError {
    /// The file is not JSON.
    #[error("backup is not valid JSON: {0}")]
    InvalidJson(String),
    /// The file has no `state` object.
    #[error("invalid backup file: missing `state`")]
    MissingState,
    /// The `state` object does not fit the current state shape.
    #[error("backup state is incompatible: {0}")]
    IncompatibleState(String),
    /// The current state could not be serialized.
    #[error("backup encode failed: {0}")]
    Encode(String),
}

/// Builds a backup of `state` stamped with `unix_ms`.
pub fn export_backup(state: &GridState, unix_ms: u64) -> BackupEnvelope {
    BackupEnvelope {
        version: BACKUP_FORMAT_VERSION,
        timestamp: platform_host::iso8601_from_unix_ms(unix_ms),
        state: state.snapshot(),
    }
}

/// Download file name for a backup taken at `unix_ms`: `omni-grid-backup-YYYY-MM-DD.json`.
pub fn backup_file_name(unix_ms: u64) -> String {
    let timestamp = platform_host::iso8601_from_unix_ms(unix_ms);
    let date = timestamp.get(..10).unwrap_or(&timestamp);
    format!("omni-grid-backup-{date}.json")
}

/// Validates an uploaded backup and overlays its `state` keys onto `current`.
///
/// Only the presence of `state` is checked; the `version` field is not. Each top-level key in the
/// imported state replaces the same key of the current snapshot and absent keys keep their
/// current values.
///
/// # Errors
///
/// Returns [`BackupError::InvalidJson`] for non-JSON text, [`BackupError::MissingState`] when
/// `state` is absent or null, and [`BackupError::IncompatibleState`] when the merged result does
/// not decode.
pub fn parse_backup(raw: &str, current: &GridSnapshot) -> Result<GridSnapshot, BackupError> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| BackupError::InvalidJson(e.to_string()))?;
    let imported = match document.get("state") {
        None | Some(Value::Null) => return Err(BackupError::MissingState),
        Some(Value::Object(imported)) => imported,
        Some(other) => {
            return Err(BackupError::IncompatibleState(format!(
                "`state` must be an object, found {other}"
            )))
        }
    };

    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(BackupError::Encode("snapshot is not an object".to_string())),
        Err(e) => return Err(BackupError::Encode(e.to_string())),
    };
    for (key, value) in imported {
        merged.insert(key.clone(), value.clone());
    }

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| BackupError::IncompatibleState(e.to_string()))
}
