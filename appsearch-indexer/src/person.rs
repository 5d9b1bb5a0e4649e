//! Person candidate documents and content fingerprints.
//!
//! A [`PersonCandidate`] is the mutable staging object for one contact
//! during one batch cycle. It is finalized synchronously into an immutable
//! document plus its fingerprint before crossing any asynchronous boundary;
//! nothing downstream ever sees partially-built state.

use crate::provider::ContactRow;
use appsearch_types::{DocumentId, GenericDocument, FINGERPRINT_PROPERTY};
use sha2::{Digest, Sha256};

/// Schema type of indexed person documents.
pub const PERSON_SCHEMA_TYPE: &str = "builtin:Person";

/// Namespace person documents live in (one corpus, unscoped).
pub const PERSON_NAMESPACE: &str = "";

mod property {
    pub const NAME: &str = "name";
    pub const GIVEN_NAME: &str = "givenName";
    pub const FAMILY_NAME: &str = "familyName";
    pub const PHONETIC_NAME: &str = "phoneticName";
    pub const NICKNAME: &str = "nickname";
    pub const ORGANIZATION: &str = "organization";
    pub const NOTES: &str = "notes";
    pub const PHONE_NUMBERS: &str = "phoneNumbers";
    pub const EMAILS: &str = "emails";
    pub const CONTACT_ID: &str = "contactId";
}

/// Identity of the indexed document for a contact id.
#[must_use]
pub fn document_id_for_contact(contact_id: i64) -> DocumentId {
    DocumentId::new(PERSON_NAMESPACE, contact_id.to_string())
}

/// A finalized, immutable person document plus its content fingerprint.
#[derive(Debug, Clone)]
pub struct FinalizedPerson {
    pub document: GenericDocument,
    pub fingerprint: Vec<u8>,
}

impl FinalizedPerson {
    /// Identity of the underlying document.
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.document.document_id()
    }
}

/// Mutable staging object for one contact within one batch cycle.
#[derive(Debug, Clone, Default)]
pub struct PersonCandidate {
    contact_id: i64,
    display_name: Option<String>,
    given_name: Option<String>,
    family_name: Option<String>,
    phonetic_name: Option<String>,
    nickname: Option<String>,
    organization: Option<String>,
    notes: Vec<String>,
    phone_numbers: Vec<String>,
    emails: Vec<String>,
    starred: bool,
}

impl PersonCandidate {
    /// Creates an empty candidate for a contact id.
    #[must_use]
    pub fn new(contact_id: i64) -> Self {
        Self {
            contact_id,
            ..Self::default()
        }
    }

    /// The contact this candidate stages.
    #[must_use]
    pub fn contact_id(&self) -> i64 {
        self.contact_id
    }

    /// Folds one provider row into the candidate.
    ///
    /// Primary display fields keep the first value seen; the provider's row
    /// ordering guarantees that value is the most authoritative one.
    /// Multi-valued fields accumulate from every row, deduplicated.
    pub fn merge_row(&mut self, row: &ContactRow) {
        debug_assert_eq!(row.contact_id, self.contact_id);

        merge_primary(&mut self.display_name, &row.display_name);
        merge_primary(&mut self.given_name, &row.given_name);
        merge_primary(&mut self.family_name, &row.family_name);
        merge_primary(&mut self.phonetic_name, &row.phonetic_name);
        merge_primary(&mut self.nickname, &row.nickname);
        merge_primary(&mut self.organization, &row.organization);

        merge_repeated(&mut self.phone_numbers, &row.phone_number);
        merge_repeated(&mut self.emails, &row.email);
        merge_repeated(&mut self.notes, &row.note);

        self.starred |= row.starred;
    }

    /// Builds the immutable document and computes its content fingerprint.
    ///
    /// The fingerprint is the SHA-256 of the canonical JSON of the indexed
    /// properties (documents serialize their property map in sorted key
    /// order), computed *before* the fingerprint property itself is stored.
    #[must_use]
    pub fn finalize(self) -> FinalizedPerson {
        let id = document_id_for_contact(self.contact_id);
        let mut document = GenericDocument::new(id.namespace, id.id, PERSON_SCHEMA_TYPE);
        document.score = i32::from(self.starred);
        document.set_long(property::CONTACT_ID, self.contact_id);
        if let Some(name) = self.display_name {
            document.set_string(property::NAME, name);
        }
        if let Some(given) = self.given_name {
            document.set_string(property::GIVEN_NAME, given);
        }
        if let Some(family) = self.family_name {
            document.set_string(property::FAMILY_NAME, family);
        }
        if let Some(phonetic) = self.phonetic_name {
            document.set_string(property::PHONETIC_NAME, phonetic);
        }
        if let Some(nickname) = self.nickname {
            document.set_string(property::NICKNAME, nickname);
        }
        if let Some(organization) = self.organization {
            document.set_string(property::ORGANIZATION, organization);
        }
        if !self.notes.is_empty() {
            document.set_string_array(property::NOTES, self.notes);
        }
        if !self.phone_numbers.is_empty() {
            document.set_string_array(property::PHONE_NUMBERS, self.phone_numbers);
        }
        if !self.emails.is_empty() {
            document.set_string_array(property::EMAILS, self.emails);
        }

        let canonical =
            serde_json::to_vec(&document.properties).expect("JSON property map always serializes");
        let fingerprint = Sha256::digest(&canonical).to_vec();
        document.set_string(FINGERPRINT_PROPERTY, hex::encode(&fingerprint));

        FinalizedPerson {
            document,
            fingerprint,
        }
    }
}

fn merge_primary(slot: &mut Option<String>, value: &Option<String>) {
    if slot.is_none() {
        if let Some(value) = value {
            *slot = Some(value.clone());
        }
    }
}

fn merge_repeated(values: &mut Vec<String>, value: &Option<String>) {
    if let Some(value) = value {
        if !values.iter().any(|existing| existing == value) {
            values.push(value.clone());
        }
    }
}

/// Groups consecutive rows sharing a contact id into one candidate each.
///
/// Rows arrive pre-grouped by the provider's ordering contract, so a plain
/// consecutive scan suffices; no map is needed.
#[must_use]
pub fn group_rows_into_candidates(rows: &[ContactRow]) -> Vec<PersonCandidate> {
    let mut candidates: Vec<PersonCandidate> = Vec::new();
    for row in rows {
        match candidates.last_mut() {
            Some(current) if current.contact_id() == row.contact_id => current.merge_row(row),
            _ => {
                let mut candidate = PersonCandidate::new(row.contact_id);
                candidate.merge_row(row);
                candidates.push(candidate);
            }
        }
    }
    candidates
}
