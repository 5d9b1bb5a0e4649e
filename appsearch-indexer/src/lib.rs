//! Contacts delta-sync batching pipeline.
//!
//! Reconciles the device contact provider's current state into the search
//! index, batching both I/O directions and skipping unchanged contacts via
//! content fingerprints.
//!
//! # Components
//!
//! - **Provider**: the external contact-row source, behind
//!   [`ContactsProvider`]
//! - **Person**: row grouping and the candidate-document builder that
//!   computes a fingerprint at finalize time
//! - **Batcher**: the two-stage diff/index batcher, one instance per run
//! - **Indexer**: the update-run state machine (remove phase, then update
//!   phase) with strict/lenient error policy
//! - **Settings**: the persisted timestamp bundle that drives delta queries
//!
//! # Update run
//!
//! ```text
//! START -> REMOVE_PHASE -> UPDATE_PHASE -> DONE
//! ```
//!
//! All pipeline state is single-threaded-sequential per run: every step is
//! awaited before the next starts, so a stage-2 flush never runs
//! concurrently with stage-1 diffing of the same batch. Cancellation is
//! cooperative and checked only at chunk/batch boundaries; an in-flight
//! provider query or store write always completes.

mod batcher;
mod cancel;
mod error;
mod indexer;
mod maintenance;
pub mod person;
mod provider;
mod settings;
mod stats;

pub use batcher::ContactsBatcher;
pub use cancel::CancellationSignal;
pub use error::{IndexerError, IndexerResult};
pub use indexer::{ContactsIndexer, IndexerConfig};
pub use maintenance::{IndexerKind, MaintenanceConfig, MaintenanceParams};
pub use person::{group_rows_into_candidates, FinalizedPerson, PersonCandidate};
pub use provider::{ContactRow, ContactsProvider, ProviderError, ProviderResult};
pub use settings::IndexerSettings;
pub use stats::{ContactsUpdateStats, ErrorCode, UpdateType};
