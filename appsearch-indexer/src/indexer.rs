//! The contacts indexer update-run state machine.

use crate::batcher::{ContactsBatcher, DEFAULT_DIFF_BATCH_SIZE, DEFAULT_INDEX_BATCH_SIZE};
use crate::cancel::CancellationSignal;
use crate::error::{IndexerError, IndexerResult};
use crate::maintenance::MaintenanceParams;
use crate::person::{document_id_for_contact, group_rows_into_candidates};
use crate::provider::{ContactsProvider, ProviderError};
use crate::settings::IndexerSettings;
use crate::stats::{ContactsUpdateStats, ErrorCode, UpdateType};
use appsearch_store::{IndexStore, StoreError};
use appsearch_types::DocumentId;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Contacts per provider query, tuned to the provider's id-list limits.
pub const DEFAULT_UPDATE_CHUNK_SIZE: usize = 100;

/// Document ids per batched delete.
pub const DEFAULT_DELETE_CHUNK_SIZE: usize = 500;

/// Configuration for one indexer instance.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Lenient mode: record transient errors in stats and keep going.
    /// Strict mode propagates the first error after best-effort flushing.
    /// An out-of-space store is fatal in both modes.
    pub should_keep_updating_on_error: bool,
    pub update_chunk_size: usize,
    pub delete_chunk_size: usize,
    pub diff_batch_size: usize,
    pub index_batch_size: usize,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            should_keep_updating_on_error: true,
            update_chunk_size: DEFAULT_UPDATE_CHUNK_SIZE,
            delete_chunk_size: DEFAULT_DELETE_CHUNK_SIZE,
            diff_batch_size: DEFAULT_DIFF_BATCH_SIZE,
            index_batch_size: DEFAULT_INDEX_BATCH_SIZE,
        }
    }
}

/// Reconciles contact-provider state into the index.
///
/// Runs must be serialized by the caller (one logical thread of control per
/// user); within a run every step is awaited before the next starts.
pub struct ContactsIndexer {
    provider: Arc<dyn ContactsProvider>,
    store: Arc<dyn IndexStore>,
    config: IndexerConfig,
    settings: Mutex<IndexerSettings>,
}

impl ContactsIndexer {
    /// Creates an indexer over the given collaborators.
    pub fn new(
        provider: Arc<dyn ContactsProvider>,
        store: Arc<dyn IndexStore>,
        config: IndexerConfig,
        settings: IndexerSettings,
    ) -> Self {
        Self {
            provider,
            store,
            config,
            settings: Mutex::new(settings),
        }
    }

    /// Scheduled entry point: picks a full or delta update based on the
    /// persisted settings and the maintenance parameters.
    pub async fn do_update_for_user(
        &self,
        params: &MaintenanceParams,
        now_ms: i64,
        cancel: &CancellationSignal,
    ) -> IndexerResult<ContactsUpdateStats> {
        let (last_full, last_delta) = {
            let settings = self.settings.lock().await;
            (
                settings.last_full_update_ms(),
                settings.last_delta_update_ms(),
            )
        };
        let needs_full = last_full == 0 || now_ms - last_full >= params.full_update_interval_ms;
        if needs_full {
            return self.do_full_update(now_ms, cancel).await;
        }
        if now_ms - last_delta < params.min_delta_interval_ms {
            // Too soon since the last delta; report an empty run instead of
            // hitting the provider.
            debug!(last_delta, now_ms, "delta update not due yet");
            return Ok(ContactsUpdateStats::new(UpdateType::Delta, now_ms));
        }
        self.do_delta_update(now_ms, cancel).await
    }

    /// Re-indexes every current contact.
    pub async fn do_full_update(
        &self,
        now_ms: i64,
        cancel: &CancellationSignal,
    ) -> IndexerResult<ContactsUpdateStats> {
        let mut stats = ContactsUpdateStats::new(UpdateType::Full, now_ms);
        info!(run_id = %stats.run_id, "starting full contacts update");

        let update_seen = self.provider.most_recent_update_timestamp().await?;
        let delete_seen = self.provider.most_recent_delete_timestamp().await?;
        let wanted = self.provider.updated_contact_ids(0).await?;
        stats.total_to_be_updated = wanted.len();

        let outcome = self.batch_update(&wanted, &[], &mut stats, cancel).await;
        if outcome.is_ok() {
            let mut settings = self.settings.lock().await;
            settings.set_last_full_update_ms(now_ms);
            settings.set_last_delta_update_ms(now_ms);
            settings.set_last_contact_update_seen_ms(update_seen);
            settings.set_last_contact_delete_seen_ms(delete_seen);
            persist_settings(&settings, &mut stats);
        }

        stats.log_summary();
        outcome.map(|()| stats)
    }

    /// Reconciles contacts changed since the persisted watermarks.
    pub async fn do_delta_update(
        &self,
        now_ms: i64,
        cancel: &CancellationSignal,
    ) -> IndexerResult<ContactsUpdateStats> {
        let mut stats = ContactsUpdateStats::new(UpdateType::Delta, now_ms);

        let (since_update, since_delete) = {
            let settings = self.settings.lock().await;
            (
                settings.last_contact_update_seen_ms(),
                settings.last_contact_delete_seen_ms(),
            )
        };
        info!(
            run_id = %stats.run_id,
            since_update, since_delete,
            "starting delta contacts update"
        );

        let update_seen = self.provider.most_recent_update_timestamp().await?;
        let delete_seen = self.provider.most_recent_delete_timestamp().await?;
        let wanted = self.provider.updated_contact_ids(since_update).await?;
        let unwanted = self.provider.deleted_contact_ids(since_delete).await?;
        stats.total_to_be_updated = wanted.len();

        let outcome = self
            .batch_update(&wanted, &unwanted, &mut stats, cancel)
            .await;
        {
            let mut settings = self.settings.lock().await;
            settings.set_last_delta_update_ms(now_ms);
            // The delete watermark advances even on a failed update phase:
            // the remove phase ran first and its failures are non-blocking
            // by contract.
            settings.set_last_contact_delete_seen_ms(delete_seen);
            if outcome.is_ok() {
                settings.set_last_contact_update_seen_ms(update_seen);
            }
            persist_settings(&settings, &mut stats);
        }

        stats.log_summary();
        outcome.map(|()| stats)
    }

    /// The two-phase run body: `REMOVE_PHASE -> UPDATE_PHASE`.
    async fn batch_update(
        &self,
        wanted: &[i64],
        unwanted: &[i64],
        stats: &mut ContactsUpdateStats,
        cancel: &CancellationSignal,
    ) -> IndexerResult<()> {
        self.remove_contacts(unwanted, stats, cancel).await?;
        self.update_contacts(wanted, stats, cancel).await
    }

    /// REMOVE_PHASE: chunked deletes.
    ///
    /// Failures here are logged and swallowed; a contact that failed to
    /// delete must never block indexing of new and updated contacts, and
    /// the watermarks advance regardless.
    async fn remove_contacts(
        &self,
        unwanted: &[i64],
        stats: &mut ContactsUpdateStats,
        cancel: &CancellationSignal,
    ) -> IndexerResult<()> {
        for chunk in unwanted.chunks(self.config.delete_chunk_size) {
            if cancel.is_cancelled() {
                stats.record_error(ErrorCode::Cancelled);
                return Err(IndexerError::Cancelled);
            }
            let ids: Vec<DocumentId> = chunk
                .iter()
                .map(|&contact_id| document_id_for_contact(contact_id))
                .collect();
            match self.store.remove_documents(&ids).await {
                Ok(result) => {
                    stats.deleted_count += result.succeeded.len();
                    if !result.failures.is_empty() {
                        stats.delete_failed_count += result.failures.len();
                        stats.record_error(ErrorCode::StoreDeleteFailed);
                        debug!(
                            failed = result.failures.len(),
                            "some contact deletions failed"
                        );
                    }
                }
                Err(err) => {
                    warn!(error = %err, "chunked contact deletion failed; continuing");
                    stats.delete_failed_count += chunk.len();
                    stats.record_error(ErrorCode::StoreDeleteFailed);
                }
            }
        }
        Ok(())
    }

    /// UPDATE_PHASE: chunked provider queries feeding a per-run batcher.
    async fn update_contacts(
        &self,
        wanted: &[i64],
        stats: &mut ContactsUpdateStats,
        cancel: &CancellationSignal,
    ) -> IndexerResult<()> {
        // One batcher per run; see the batcher module for why sharing one
        // across runs is forbidden.
        let mut batcher =
            ContactsBatcher::new(self.config.diff_batch_size, self.config.index_batch_size);

        for chunk in wanted.chunks(self.config.update_chunk_size) {
            if cancel.is_cancelled() {
                stats.record_error(ErrorCode::Cancelled);
                let _ = batcher.flush(self.store.as_ref(), stats).await;
                return Err(IndexerError::Cancelled);
            }

            let rows = match self.provider.query_contact_rows(chunk).await {
                Ok(rows) => rows,
                Err(err) => {
                    stats.record_error(provider_error_code(&err));
                    if self.config.should_keep_updating_on_error {
                        warn!(error = %err, "provider query failed; continuing with next chunk");
                        continue;
                    }
                    let _ = batcher.flush(self.store.as_ref(), stats).await;
                    return Err(err.into());
                }
            };

            for candidate in group_rows_into_candidates(&rows) {
                if let Err(err) = batcher.add(candidate, self.store.as_ref(), stats).await {
                    stats.record_error(indexer_error_code(&err));
                    if err.is_out_of_space() || !self.config.should_keep_updating_on_error {
                        if !err.is_out_of_space() {
                            let _ = batcher.flush(self.store.as_ref(), stats).await;
                        }
                        return Err(err);
                    }
                    warn!(error = %err, "indexing failed; continuing");
                }
            }
        }

        if let Err(err) = batcher.flush(self.store.as_ref(), stats).await {
            stats.record_error(indexer_error_code(&err));
            if err.is_out_of_space() || !self.config.should_keep_updating_on_error {
                return Err(err);
            }
            warn!(error = %err, "final batch flush failed");
        }
        Ok(())
    }
}

fn provider_error_code(err: &ProviderError) -> ErrorCode {
    match err {
        ProviderError::NullCursor => ErrorCode::NullCursor,
        ProviderError::Query(_) => ErrorCode::ProviderQueryFailed,
    }
}

fn indexer_error_code(err: &IndexerError) -> ErrorCode {
    match err {
        IndexerError::Provider(inner) => provider_error_code(inner),
        IndexerError::Store(StoreError::OutOfSpace) => ErrorCode::OutOfSpace,
        IndexerError::Store(_) => ErrorCode::StoreWriteFailed,
        IndexerError::Io(_) | IndexerError::Serialization(_) => ErrorCode::SettingsPersistFailed,
        IndexerError::Cancelled => ErrorCode::Cancelled,
    }
}

fn persist_settings(settings: &IndexerSettings, stats: &mut ContactsUpdateStats) {
    if let Err(err) = settings.persist() {
        // Worst case is extra re-indexing on the next run; not fatal.
        warn!(error = %err, "failed to persist indexer settings");
        stats.record_error(ErrorCode::SettingsPersistFailed);
    }
}
