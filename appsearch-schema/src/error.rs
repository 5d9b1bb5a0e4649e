//! Error types for the schema layer.

use appsearch_types::PrefixError;
use thiserror::Error;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur while maintaining or querying the schema cache.
///
/// Absence of a prefix or type is *not* an error for lookups (those return
/// empty collections); these variants all indicate a violated contract in
/// the registered schema itself and fail the current call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A registered type names a parent that is not present in the same
    /// prefix's schema map. Derived maps cannot be built from it.
    #[error("schema type {schema_type:?} not found under prefix {prefix:?}")]
    MissingSchemaType { prefix: String, schema_type: String },

    /// The parent graph reachable from a type contains a cycle.
    #[error("cyclic inheritance reachable from {schema_type:?} under prefix {prefix:?}")]
    CyclicInheritance { prefix: String, schema_type: String },

    /// A stored type name was not prefixed as required.
    #[error(transparent)]
    Prefix(#[from] PrefixError),
}
