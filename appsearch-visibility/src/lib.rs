//! Visibility/ACL evaluation for prefixed schema types.
//!
//! [`checker::is_schema_searchable_by_caller`] decides, for one
//! (caller, prefixed schema type) pair, whether the caller may observe the
//! type's documents. Evaluation is synchronous, in-memory and stateless:
//! policy and platform state are supplied per invocation through the
//! [`VisibilityPolicySource`] and [`PackageAuthority`] seams, never cached
//! across calls, since package signatures and permission grants can change
//! at any time.

pub mod authority;
pub mod checker;
mod error;

pub use authority::{PackageAuthority, VisibilityPolicySource};
pub use checker::{is_schema_searchable_by_caller, resolve_caller_access};
pub use error::VisibilityError;

/// Package name owning the visibility store's internal bookkeeping types.
/// Documents under it are never visible to any caller.
pub const VISIBILITY_PACKAGE_NAME: &str = "VS#Pkg";

/// Database name of the visibility store's internal namespace.
pub const VISIBILITY_DATABASE_NAME: &str = "VS#Db";
