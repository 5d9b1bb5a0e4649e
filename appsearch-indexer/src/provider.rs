//! Contact provider interface (CP2 boundary).
//!
//! The provider is an opaque row source. The one ordering contract the
//! pipeline relies on: rows come back sorted by
//! `(contact_id, is_super_primary desc, is_primary desc, raw_contact_id)`,
//! so the first row seen for a contact id carries that contact's most
//! authoritative primary display fields.

use async_trait::async_trait;
use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced by the contact provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider returned no cursor at all for a query.
    #[error("contact provider returned a null cursor")]
    NullCursor,

    /// The query itself failed.
    #[error("contact provider query failed: {0}")]
    Query(String),
}

/// One row of the contact projection.
///
/// A contact with several raw contacts (or several phone numbers/emails)
/// spans multiple consecutive rows sharing one `contact_id`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactRow {
    pub contact_id: i64,
    pub raw_contact_id: i64,
    pub is_super_primary: bool,
    pub is_primary: bool,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub phonetic_name: Option<String>,
    pub nickname: Option<String>,
    pub organization: Option<String>,
    pub note: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub starred: bool,
}

impl ContactRow {
    /// Creates an empty row for a contact id.
    #[must_use]
    pub fn new(contact_id: i64) -> Self {
        Self {
            contact_id,
            ..Self::default()
        }
    }
}

/// The external contact provider.
///
/// Timestamps are epoch milliseconds as reported by the provider itself,
/// never the device clock; they feed the persisted delta-sync watermarks.
#[async_trait]
pub trait ContactsProvider: Send + Sync {
    /// Most recent contact-update timestamp known to the provider.
    async fn most_recent_update_timestamp(&self) -> ProviderResult<i64>;

    /// Most recent contact-deletion timestamp known to the provider.
    async fn most_recent_delete_timestamp(&self) -> ProviderResult<i64>;

    /// Ids of contacts created or updated strictly after `since_ms`.
    /// `since_ms = 0` returns every current contact id (full update).
    async fn updated_contact_ids(&self, since_ms: i64) -> ProviderResult<Vec<i64>>;

    /// Ids of contacts deleted strictly after `since_ms`.
    async fn deleted_contact_ids(&self, since_ms: i64) -> ProviderResult<Vec<i64>>;

    /// Queries the full projection for a batch of contact ids, pre-sorted
    /// per the module-level ordering contract. Callers chunk the id list to
    /// the provider's query limits before calling.
    async fn query_contact_rows(&self, contact_ids: &[i64]) -> ProviderResult<Vec<ContactRow>>;
}
