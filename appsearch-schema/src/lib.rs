//! Prefixed schema registry and type-hierarchy resolver.
//!
//! [`SchemaCache`] answers polymorphism queries (ancestors of a type,
//! descendant closure of a filter set) in time proportional to the hierarchy
//! rather than the full schema. It follows an explicit two-phase mutation
//! protocol: `add`/`remove` only touch the raw schema map, and derived
//! hierarchy maps are valid only immediately after a `rebuild_cache*` call.
//! Callers serialize the mutate-then-rebuild sequence; readers only ever see
//! a rebuilt snapshot.

mod cache;
mod error;

pub use cache::SchemaCache;
pub use error::{SchemaError, SchemaResult};
