//! In-memory index store for tests and local tooling.

use crate::error::{StoreError, StoreResult};
use crate::store::{BatchFailure, BatchResult, IndexStore};
use appsearch_types::{DocumentId, GenericDocument, VisibilityPolicy};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentId, GenericDocument>,
    policies: HashMap<String, VisibilityPolicy>,
    /// When set, remaining document capacity; a put beyond it fails the
    /// whole batch with `OutOfSpace`, mirroring the native engine.
    capacity: Option<usize>,
    /// Ids whose next put fails as an isolated per-item error.
    failing_ids: Vec<DocumentId>,
    /// When set, the next `put_documents` call fails wholesale.
    put_error: Option<StoreError>,
}

/// In-memory [`IndexStore`] with injectable failures.
#[derive(Default)]
pub struct MemoryIndexStore {
    inner: RwLock<Inner>,
    put_calls: AtomicUsize,
    put_documents_total: AtomicUsize,
}

impl MemoryIndexStore {
    /// Creates an empty store with unlimited capacity.
    #[must_use]
    pub fn open_in_memory() -> Self {
        Self::default()
    }

    /// Limits the number of documents the store will hold.
    pub async fn set_capacity(&self, capacity: usize) {
        self.inner.write().await.capacity = Some(capacity);
    }

    /// Makes puts of the given id fail with an isolated per-item error.
    pub async fn fail_document(&self, id: DocumentId) {
        self.inner.write().await.failing_ids.push(id);
    }

    /// Makes the next `put_documents` call fail wholesale.
    pub async fn fail_next_put(&self, error: StoreError) {
        self.inner.write().await.put_error = Some(error);
    }

    /// Stores a visibility policy (test setup; the real store writes these
    /// through its own internal namespace).
    pub async fn put_visibility_policy(&self, policy: VisibilityPolicy) {
        self.inner
            .write()
            .await
            .policies
            .insert(policy.schema_type.clone(), policy);
    }

    /// Number of `put_documents` calls so far.
    #[must_use]
    pub fn put_call_count(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of documents written across all put calls.
    #[must_use]
    pub fn documents_written(&self) -> usize {
        self.put_documents_total.load(Ordering::SeqCst)
    }

    /// Number of documents currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    /// Returns true if no documents are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns a stored document, if present.
    pub async fn document(&self, id: &DocumentId) -> Option<GenericDocument> {
        self.inner.read().await.documents.get(id).cloned()
    }
}

#[async_trait]
impl IndexStore for MemoryIndexStore {
    async fn get_document_fingerprints(
        &self,
        ids: &[DocumentId],
    ) -> StoreResult<HashMap<DocumentId, Vec<u8>>> {
        let inner = self.inner.read().await;
        let mut fingerprints = HashMap::new();
        for id in ids {
            if let Some(fingerprint) = inner.documents.get(id).and_then(|d| d.fingerprint()) {
                fingerprints.insert(id.clone(), fingerprint);
            }
        }
        Ok(fingerprints)
    }

    async fn put_documents(&self, documents: Vec<GenericDocument>) -> StoreResult<BatchResult> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        let mut inner = self.inner.write().await;

        if let Some(error) = inner.put_error.take() {
            return Err(error);
        }
        if let Some(capacity) = inner.capacity {
            if inner.documents.len() + documents.len() > capacity {
                return Err(StoreError::OutOfSpace);
            }
        }

        let mut result = BatchResult::default();
        for document in documents {
            let id = document.document_id();
            if inner.failing_ids.contains(&id) {
                result.failures.push(BatchFailure {
                    id,
                    error: StoreError::Internal("injected put failure".to_string()),
                });
                continue;
            }
            inner.documents.insert(id.clone(), document);
            result.succeeded.push(id);
            self.put_documents_total.fetch_add(1, Ordering::SeqCst);
        }
        Ok(result)
    }

    async fn remove_documents(&self, ids: &[DocumentId]) -> StoreResult<BatchResult> {
        let mut inner = self.inner.write().await;
        let mut result = BatchResult::default();
        for id in ids {
            if inner.documents.remove(id).is_some() {
                result.succeeded.push(id.clone());
            } else {
                result.failures.push(BatchFailure {
                    id: id.clone(),
                    error: StoreError::NotFound(id.to_string()),
                });
            }
        }
        Ok(result)
    }

    async fn get_visibility_policy(
        &self,
        prefixed_schema_type: &str,
    ) -> StoreResult<Option<VisibilityPolicy>> {
        Ok(self
            .inner
            .read()
            .await
            .policies
            .get(prefixed_schema_type)
            .cloned())
    }
}
