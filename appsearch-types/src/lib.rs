//! Core type definitions for the AppSearch index layer.
//!
//! Everything stored in the index is scoped under a [`prefix`]: a composite
//! `package$database/` key that isolates tenants sharing one physical store.
//! This crate defines the prefixed value types the other crates operate on:
//!
//! - **Schema types** ([`SchemaTypeConfig`]) with polymorphic parent lists
//! - **Documents** ([`GenericDocument`]) as schema-typed property bags
//! - **Visibility policies** ([`VisibilityPolicy`]) describing who may
//!   observe a schema type's documents
//! - **Caller identity** ([`CallerAccess`]) as resolved by the platform
//!
//! No I/O happens here; these are plain values shared across the workspace.

pub mod document;
pub mod prefix;
pub mod schema;
pub mod visibility;

pub use document::{DocumentId, GenericDocument, FINGERPRINT_PROPERTY};
pub use prefix::{create_prefix, PrefixError};
pub use schema::{Cardinality, PropertyConfig, PropertyDataType, SchemaTypeConfig};
pub use visibility::{
    permission, CallerAccess, PackageIdentifier, VisibilityCriteria, VisibilityPolicy,
};
