//! Maintenance scheduling parameters.
//!
//! The external job scheduler owns *when* "do update for user" fires; this
//! table owns the per-indexer-kind intervals it consults. Built once at
//! startup and passed by reference; there is no process-global instance.

/// The indexers the maintenance scheduler knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexerKind {
    Contacts,
    /// Reserved for the apps indexer; parameters exist so the scheduler
    /// can be wired up without another table shape change.
    Apps,
}

/// Scheduling parameters for one indexer kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceParams {
    pub kind: IndexerKind,
    /// Minimum spacing between two delta updates.
    pub min_delta_interval_ms: i64,
    /// A full update is forced once this much time has passed since the
    /// last one.
    pub full_update_interval_ms: i64,
}

/// Per-kind parameter table.
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    contacts: MaintenanceParams,
    apps: MaintenanceParams,
}

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

impl MaintenanceConfig {
    /// Builds the table with platform-default intervals.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contacts: MaintenanceParams {
                kind: IndexerKind::Contacts,
                min_delta_interval_ms: 2 * HOUR_MS,
                full_update_interval_ms: 30 * DAY_MS,
            },
            apps: MaintenanceParams {
                kind: IndexerKind::Apps,
                min_delta_interval_ms: 12 * HOUR_MS,
                full_update_interval_ms: 30 * DAY_MS,
            },
        }
    }

    /// Parameters for one indexer kind.
    #[must_use]
    pub fn params(&self, kind: IndexerKind) -> &MaintenanceParams {
        match kind {
            IndexerKind::Contacts => &self.contacts,
            IndexerKind::Apps => &self.apps,
        }
    }
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self::new()
    }
}
