//! Schema type definitions.
//!
//! A schema type describes the shape of one kind of document: its properties
//! and, for polymorphism, the parent types it extends. The parent graph may
//! contain diamonds (one ancestor reachable through two chains) but never
//! cycles; the schema cache enforces this when it rebuilds derived maps.

use serde::{Deserialize, Serialize};

/// Data type of a single property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyDataType {
    String,
    Long,
    Double,
    Boolean,
    Bytes,
    Document,
}

/// How many values a property may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinality {
    Required,
    Optional,
    Repeated,
}

/// A single property declaration within a schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyConfig {
    pub name: String,
    pub data_type: PropertyDataType,
    pub cardinality: Cardinality,
}

impl PropertyConfig {
    fn simple(name: &str, data_type: PropertyDataType, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            data_type,
            cardinality,
        }
    }

    /// Shorthand for an optional string property.
    pub fn string(name: &str) -> Self {
        Self::simple(name, PropertyDataType::String, Cardinality::Optional)
    }

    /// Shorthand for a repeated string property.
    pub fn repeated_string(name: &str) -> Self {
        Self::simple(name, PropertyDataType::String, Cardinality::Repeated)
    }

    /// Shorthand for an optional integer property.
    pub fn long(name: &str) -> Self {
        Self::simple(name, PropertyDataType::Long, Cardinality::Optional)
    }

    /// Shorthand for an optional boolean property.
    pub fn boolean(name: &str) -> Self {
        Self::simple(name, PropertyDataType::Boolean, Cardinality::Optional)
    }
}

/// A named, versioned schema type registered under some prefix.
///
/// `schema_type` and every entry of `parent_types` carry the owning prefix,
/// exactly as stored in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaTypeConfig {
    pub schema_type: String,
    /// Direct parents, in declaration order. Order matters: it seeds the
    /// deterministic topological ordering of transitive ancestors.
    pub parent_types: Vec<String>,
    pub properties: Vec<PropertyConfig>,
    pub version: u32,
    pub description: String,
}

impl SchemaTypeConfig {
    /// Creates a schema type with no parents and no properties.
    #[must_use]
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
            parent_types: Vec::new(),
            properties: Vec::new(),
            version: 0,
            description: String::new(),
        }
    }

    /// Adds a direct parent type (prefixed).
    #[must_use]
    pub fn with_parent(mut self, parent_type: impl Into<String>) -> Self {
        self.parent_types.push(parent_type.into());
        self
    }

    /// Adds a property declaration.
    #[must_use]
    pub fn with_property(mut self, property: PropertyConfig) -> Self {
        self.properties.push(property);
        self
    }

    /// Sets the schema version.
    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }
}
