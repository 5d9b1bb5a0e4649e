//! Per-run update statistics.
//!
//! One [`ContactsUpdateStats`] is created at run start, accumulated
//! throughout, logged at run end and then discarded. Errors never reach the
//! end user; they are observable only here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;
use uuid::Uuid;

/// Kind of update run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateType {
    Full,
    Delta,
}

/// Typed error codes recorded into run stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorCode {
    ProviderQueryFailed,
    NullCursor,
    StoreWriteFailed,
    StoreDeleteFailed,
    OutOfSpace,
    Cancelled,
    SettingsPersistFailed,
}

/// Mutable counters for one full/delta update run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactsUpdateStats {
    pub update_type: UpdateType,
    /// Run identifier, for correlating log lines of one run.
    pub run_id: Uuid,
    pub start_timestamp_ms: i64,
    /// Contacts the run set out to (re-)index.
    pub total_to_be_updated: usize,
    /// Contacts indexed for the first time.
    pub new_count: usize,
    /// Contacts re-indexed because their fingerprint changed.
    pub updated_count: usize,
    /// Contacts dropped because their fingerprint was unchanged.
    pub skipped_count: usize,
    /// Documents removed in the remove phase.
    pub deleted_count: usize,
    /// Documents that failed to delete (logged and swallowed).
    pub delete_failed_count: usize,
    /// Documents that failed to index (isolated per-item failures).
    pub update_failed_count: usize,
    pub error_codes: BTreeSet<ErrorCode>,
}

impl ContactsUpdateStats {
    /// Creates zeroed stats for a new run.
    #[must_use]
    pub fn new(update_type: UpdateType, start_timestamp_ms: i64) -> Self {
        Self {
            update_type,
            run_id: Uuid::now_v7(),
            start_timestamp_ms,
            total_to_be_updated: 0,
            new_count: 0,
            updated_count: 0,
            skipped_count: 0,
            deleted_count: 0,
            delete_failed_count: 0,
            update_failed_count: 0,
            error_codes: BTreeSet::new(),
        }
    }

    /// Records a typed error code. Idempotent per code.
    pub fn record_error(&mut self, code: ErrorCode) {
        self.error_codes.insert(code);
    }

    /// True if any error code was recorded.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.error_codes.is_empty()
    }

    /// Emits the run summary to the log.
    pub fn log_summary(&self) {
        info!(
            run_id = %self.run_id,
            update_type = ?self.update_type,
            total = self.total_to_be_updated,
            new = self.new_count,
            updated = self.updated_count,
            skipped = self.skipped_count,
            deleted = self.deleted_count,
            delete_failed = self.delete_failed_count,
            update_failed = self.update_failed_count,
            errors = ?self.error_codes,
            "contacts update run finished"
        );
    }
}
