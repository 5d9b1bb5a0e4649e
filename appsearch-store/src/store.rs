//! The `IndexStore` trait.

use crate::error::{StoreError, StoreResult};
use appsearch_types::{DocumentId, GenericDocument, VisibilityPolicy};
use async_trait::async_trait;
use std::collections::HashMap;

/// One failed item within a batched operation.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFailure {
    pub id: DocumentId,
    pub error: StoreError,
}

/// Per-item results of a batched put/remove.
///
/// A failure is isolated to its item; sibling items in the same batch still
/// succeed or fail on their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub succeeded: Vec<DocumentId>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResult {
    /// Returns true if every item in the batch succeeded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The slice of the native index engine the core depends on.
///
/// All methods are suspension points; callers sequence them so no two
/// batched operations over the same mutable pipeline state overlap.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Batched fingerprint lookup. Ids with no stored document (or no
    /// stored fingerprint) are simply absent from the returned map.
    async fn get_document_fingerprints(
        &self,
        ids: &[DocumentId],
    ) -> StoreResult<HashMap<DocumentId, Vec<u8>>>;

    /// Writes a batch of documents. Per-item failures are reported in the
    /// result; an `Err` return means the batch as a whole failed.
    async fn put_documents(&self, documents: Vec<GenericDocument>) -> StoreResult<BatchResult>;

    /// Removes a batch of documents by id.
    async fn remove_documents(&self, ids: &[DocumentId]) -> StoreResult<BatchResult>;

    /// Reads the stored visibility policy for a prefixed schema type.
    async fn get_visibility_policy(
        &self,
        prefixed_schema_type: &str,
    ) -> StoreResult<Option<VisibilityPolicy>>;
}
