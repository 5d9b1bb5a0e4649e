//! The two-stage contacts batcher.
//!
//! Stage 1 (diff batch): buffers candidates; when full, finalizes them,
//! fetches their stored fingerprints in one batched lookup and drops the
//! unchanged ones. Stage 2 (index batch): buffers the survivors and writes
//! them in one batched put.
//!
//! One batcher instance serves exactly one update run. Sharing an instance
//! across concurrent runs corrupts both the counters and the batched
//! content; the indexer constructs a fresh one per run. The struct is not
//! thread-safe and does not need to be: every method is awaited to
//! completion before the next is called.

use crate::error::IndexerResult;
use crate::person::{FinalizedPerson, PersonCandidate};
use crate::stats::{ContactsUpdateStats, ErrorCode};
use appsearch_store::IndexStore;
use appsearch_types::DocumentId;
use tracing::{debug, warn};

/// Default size of the stage-1 diff batch.
pub const DEFAULT_DIFF_BATCH_SIZE: usize = 50;

/// Default size of the stage-2 index batch. One stage-1 drain can add up to
/// a full diff batch at once, so the index batch may briefly hold up to
/// twice this before the forced flush that follows every drain.
pub const DEFAULT_INDEX_BATCH_SIZE: usize = 50;

/// Two-stage diff/index batcher for person candidates.
pub struct ContactsBatcher {
    diff_batch_size: usize,
    index_batch_size: usize,
    diff_batch: Vec<PersonCandidate>,
    index_batch: Vec<FinalizedPerson>,
}

impl ContactsBatcher {
    /// Creates an empty batcher with the given stage sizes.
    #[must_use]
    pub fn new(diff_batch_size: usize, index_batch_size: usize) -> Self {
        Self {
            diff_batch_size: diff_batch_size.max(1),
            index_batch_size: index_batch_size.max(1),
            diff_batch: Vec::new(),
            index_batch: Vec::new(),
        }
    }

    /// Number of candidates waiting in the stage-1 diff batch.
    #[must_use]
    pub fn pending_diff(&self) -> usize {
        self.diff_batch.len()
    }

    /// Number of documents waiting in the stage-2 index batch.
    #[must_use]
    pub fn pending_index(&self) -> usize {
        self.index_batch.len()
    }

    /// Stages one candidate, draining stage 1 when it fills.
    pub async fn add(
        &mut self,
        candidate: PersonCandidate,
        store: &dyn IndexStore,
        stats: &mut ContactsUpdateStats,
    ) -> IndexerResult<()> {
        self.diff_batch.push(candidate);
        if self.diff_batch.len() >= self.diff_batch_size {
            self.drain_diff_batch(store, stats).await?;
        }
        Ok(())
    }

    /// Flushes both stages; call once at the end of a run.
    pub async fn flush(
        &mut self,
        store: &dyn IndexStore,
        stats: &mut ContactsUpdateStats,
    ) -> IndexerResult<()> {
        self.drain_diff_batch(store, stats).await?;
        self.flush_index_batch(store, stats).await
    }

    /// Finalizes the staged candidates, diffs them against stored
    /// fingerprints and queues the net-new/changed ones for indexing.
    ///
    /// Candidates whose stored fingerprint is unchanged are dropped here;
    /// that skip is the whole point of the stage.
    async fn drain_diff_batch(
        &mut self,
        store: &dyn IndexStore,
        stats: &mut ContactsUpdateStats,
    ) -> IndexerResult<()> {
        if self.diff_batch.is_empty() {
            return Ok(());
        }

        let finalized: Vec<FinalizedPerson> = self
            .diff_batch
            .drain(..)
            .map(PersonCandidate::finalize)
            .collect();
        let ids: Vec<DocumentId> = finalized.iter().map(FinalizedPerson::id).collect();
        let stored = store.get_document_fingerprints(&ids).await?;

        for person in finalized {
            match stored.get(&person.id()) {
                None => {
                    stats.new_count += 1;
                    self.index_batch.push(person);
                }
                Some(stored_fingerprint) if *stored_fingerprint != person.fingerprint => {
                    stats.updated_count += 1;
                    self.index_batch.push(person);
                }
                Some(_) => {
                    stats.skipped_count += 1;
                }
            }
        }
        debug!(
            queued = self.index_batch.len(),
            skipped_total = stats.skipped_count,
            "diff batch drained"
        );

        if self.index_batch.len() >= self.index_batch_size {
            self.flush_index_batch(store, stats).await?;
        }
        Ok(())
    }

    /// Writes the stage-2 batch in one batched put.
    async fn flush_index_batch(
        &mut self,
        store: &dyn IndexStore,
        stats: &mut ContactsUpdateStats,
    ) -> IndexerResult<()> {
        if self.index_batch.is_empty() {
            return Ok(());
        }

        let documents = std::mem::take(&mut self.index_batch)
            .into_iter()
            .map(|person| person.document)
            .collect();
        let result = store.put_documents(documents).await?;
        if !result.failures.is_empty() {
            // Per-item failures are isolated; count them and move on.
            warn!(
                failed = result.failures.len(),
                "some documents failed to index"
            );
            stats.update_failed_count += result.failures.len();
            stats.record_error(ErrorCode::StoreWriteFailed);
        }
        Ok(())
    }
}
