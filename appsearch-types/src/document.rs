//! Generic documents stored in the index.
//!
//! A document is a schema-typed bag of JSON properties identified by
//! `(namespace, id)` within its owning prefix. Properties live in a
//! `BTreeMap` so their serialized form is canonical; content fingerprints
//! hash that canonical form and must be stable across rebuilds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Property under which a document's content fingerprint is stored, so the
/// index store can answer batched fingerprint lookups without re-reading
/// full documents.
pub const FINGERPRINT_PROPERTY: &str = "fingerprint";

/// Identity of a document within its prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId {
    pub namespace: String,
    pub id: String,
}

impl DocumentId {
    #[must_use]
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.namespace, self.id)
    }
}

/// A schema-typed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericDocument {
    pub namespace: String,
    pub id: String,
    pub schema_type: String,
    pub creation_timestamp_ms: i64,
    pub ttl_millis: i64,
    pub score: i32,
    pub properties: BTreeMap<String, Value>,
}

impl GenericDocument {
    /// Creates an empty document of the given schema type.
    #[must_use]
    pub fn new(
        namespace: impl Into<String>,
        id: impl Into<String>,
        schema_type: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
            schema_type: schema_type.into(),
            creation_timestamp_ms: 0,
            ttl_millis: 0,
            score: 0,
            properties: BTreeMap::new(),
        }
    }

    /// Returns this document's identity key.
    #[must_use]
    pub fn document_id(&self) -> DocumentId {
        DocumentId::new(self.namespace.clone(), self.id.clone())
    }

    /// Sets a string property.
    pub fn set_string(&mut self, name: &str, value: impl Into<String>) {
        self.properties
            .insert(name.to_string(), Value::String(value.into()));
    }

    /// Sets a repeated string property.
    pub fn set_string_array(&mut self, name: &str, values: Vec<String>) {
        self.properties.insert(
            name.to_string(),
            Value::Array(values.into_iter().map(Value::String).collect()),
        );
    }

    /// Sets an integer property.
    pub fn set_long(&mut self, name: &str, value: i64) {
        self.properties.insert(name.to_string(), Value::from(value));
    }

    /// Sets a boolean property.
    pub fn set_boolean(&mut self, name: &str, value: bool) {
        self.properties.insert(name.to_string(), Value::Bool(value));
    }

    /// Returns a string property, if present and a string.
    #[must_use]
    pub fn string_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(Value::as_str)
    }

    /// Returns the stored content fingerprint, if any.
    ///
    /// Fingerprints are stored hex-encoded under [`FINGERPRINT_PROPERTY`].
    #[must_use]
    pub fn fingerprint(&self) -> Option<Vec<u8>> {
        self.string_property(FINGERPRINT_PROPERTY)
            .and_then(|h| hex::decode(h).ok())
    }
}
