//! Collaborator seams for visibility evaluation.
//!
//! Both traits are synchronous: the platform services behind them answer
//! from local state, and the checker must stay free of suspension points so
//! it can run under a read lock on the schema snapshot.

use appsearch_types::{CallerAccess, PackageIdentifier, VisibilityPolicy};

/// Read access to stored visibility policies, supplied by the caller per
/// invocation. Implementations typically front the index store's dedicated
/// visibility namespace.
pub trait VisibilityPolicySource {
    /// Returns the stored policy for a prefixed schema type, if any.
    /// Absence means the type falls back to default (system-only) access.
    fn policy_for(&self, prefixed_schema_type: &str) -> Option<VisibilityPolicy>;
}

/// Platform package/permission authority.
///
/// The contract mirrors the platform primitives the checker defers to; none
/// of these decisions can be made from stored state alone.
pub trait PackageAuthority {
    /// Returns true if the package's signing certificate matches the
    /// identifier's SHA-256 digest. Implementations accept a rotated
    /// certificate anywhere in the package's signing history but must
    /// reject multi-signer packages, whose identity is ambiguous.
    fn verify_signing_certificate(&self, package: &PackageIdentifier) -> bool;

    /// Returns true if the caller currently holds the given permission.
    /// `for_enterprise` selects the managed-profile evaluation of the
    /// permission where the platform distinguishes the two.
    fn is_permission_granted(
        &self,
        permission_id: i64,
        caller: &CallerAccess,
        for_enterprise: bool,
    ) -> bool;

    /// Platform package-visibility primitive: may `calling_package` query
    /// `target_package` at all?
    fn can_package_query(&self, calling_package: &str, target_package: &str) -> bool;

    /// Returns true if the package holds system-level read access. Used
    /// when resolving a [`CallerAccess`] before evaluation, not by the
    /// checker itself.
    fn has_system_access(&self, package_name: &str) -> bool;
}
