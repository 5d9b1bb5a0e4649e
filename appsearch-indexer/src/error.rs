//! Error types for the indexer pipeline.

use crate::provider::ProviderError;
use appsearch_store::StoreError;
use thiserror::Error;

/// Result type for indexer operations.
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Errors that can abort an update run.
#[derive(Debug, Error)]
pub enum IndexerError {
    /// Contact provider query failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Index store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings file I/O failure.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings (de)serialization failure.
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The run's cancellation signal fired at a chunk boundary.
    #[error("update run cancelled")]
    Cancelled,
}

impl IndexerError {
    /// True for the one condition that stays fatal even in lenient mode:
    /// continuing to index while the store is full wastes work and may
    /// worsen the condition.
    #[must_use]
    pub fn is_out_of_space(&self) -> bool {
        matches!(self, Self::Store(StoreError::OutOfSpace))
    }
}
