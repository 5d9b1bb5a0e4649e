//! Persisted indexer settings.
//!
//! A flat key→timestamp bundle that survives restarts and drives delta
//! queries. Writes go through a temp file and an atomic rename so a crash
//! never leaves truncated state behind; on the next run the previous bundle
//! is still intact and the worst case is some re-indexing.

use crate::error::IndexerResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The persisted timestamps, all epoch milliseconds; 0 means "never".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TimestampBundle {
    /// Wall time of the last successful full update.
    last_full_update_ms: i64,
    /// Wall time of the last successful delta update.
    last_delta_update_ms: i64,
    /// Highest contact-update timestamp already reconciled.
    last_contact_update_seen_ms: i64,
    /// Highest contact-deletion timestamp already reconciled.
    last_contact_delete_seen_ms: i64,
}

/// Settings store for the contacts indexer.
#[derive(Debug)]
pub struct IndexerSettings {
    path: Option<PathBuf>,
    bundle: TimestampBundle,
}

impl IndexerSettings {
    /// Loads settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: impl Into<PathBuf>) -> IndexerResult<Self> {
        let path = path.into();
        let bundle = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => TimestampBundle::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path: Some(path),
            bundle,
        })
    }

    /// Creates settings that are never persisted (for testing).
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self {
            path: None,
            bundle: TimestampBundle::default(),
        }
    }

    /// Persists the bundle atomically (write-temp-then-rename).
    pub fn persist(&self) -> IndexerResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(&self.bundle)?;
        let temp_path = temp_path_for(path);
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;
        debug!(path = %path.display(), "persisted indexer settings");
        Ok(())
    }

    pub fn last_full_update_ms(&self) -> i64 {
        self.bundle.last_full_update_ms
    }

    pub fn set_last_full_update_ms(&mut self, timestamp_ms: i64) {
        self.bundle.last_full_update_ms = timestamp_ms;
    }

    pub fn last_delta_update_ms(&self) -> i64 {
        self.bundle.last_delta_update_ms
    }

    pub fn set_last_delta_update_ms(&mut self, timestamp_ms: i64) {
        self.bundle.last_delta_update_ms = timestamp_ms;
    }

    pub fn last_contact_update_seen_ms(&self) -> i64 {
        self.bundle.last_contact_update_seen_ms
    }

    pub fn set_last_contact_update_seen_ms(&mut self, timestamp_ms: i64) {
        self.bundle.last_contact_update_seen_ms = timestamp_ms;
    }

    pub fn last_contact_delete_seen_ms(&self) -> i64 {
        self.bundle.last_contact_delete_seen_ms
    }

    pub fn set_last_contact_delete_seen_ms(&mut self, timestamp_ms: i64) {
        self.bundle.last_contact_delete_seen_ms = timestamp_ms;
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
