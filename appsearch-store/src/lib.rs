//! Index-store interface boundary.
//!
//! The native index engine that performs on-disk indexing and querying is an
//! external collaborator; this crate specifies the slice of it the core
//! depends on. The [`IndexStore`] trait is the only I/O surface the schema,
//! visibility and indexer layers see. [`MemoryIndexStore`] implements it in
//! memory for tests and local tooling, following the same
//! `open_in_memory`-style split the persistent stores use elsewhere.

mod error;
mod memory;
mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryIndexStore;
pub use store::{BatchFailure, BatchResult, IndexStore};
