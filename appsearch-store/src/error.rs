//! Error types for the index-store boundary.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by an index store.
///
/// `OutOfSpace` is its own variant rather than a string: the indexer must
/// treat it as fatal in every error-handling mode, so it has to be
/// matchable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The index store has no space left for new documents.
    #[error("index store is out of space")]
    OutOfSpace,

    /// The store is temporarily unavailable (e.g. mid-recovery).
    #[error("index store unavailable: {0}")]
    Unavailable(String),

    /// Any other store-internal failure.
    #[error("index store error: {0}")]
    Internal(String),
}
