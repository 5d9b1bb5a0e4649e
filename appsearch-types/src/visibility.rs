//! Visibility (ACL) value types.
//!
//! One [`VisibilityPolicy`] is stored per prefixed schema type, in the
//! visibility store's own internal namespace. A policy combines a set of
//! OR-evaluated criteria (any one match grants access) with a list of
//! AND-evaluated criteria groups (all criteria specified by one group must
//! match). Evaluation itself lives in `appsearch-visibility`; these are the
//! stored values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Permission identifiers understood by the visibility evaluator.
///
/// Stored policies carry raw ids so that a policy written by a newer schema
/// version stays representable; the evaluator fails closed on ids it does
/// not recognize.
pub mod permission {
    pub const READ_SMS: i64 = 1;
    pub const READ_CALENDAR: i64 = 2;
    pub const READ_CONTACTS: i64 = 3;
    pub const READ_EXTERNAL_STORAGE: i64 = 4;
    pub const READ_HOME_APP_SEARCH_DATA: i64 = 5;
    pub const READ_ASSISTANT_APP_SEARCH_DATA: i64 = 6;
    pub const ENTERPRISE_ACCESS: i64 = 7;
    pub const MANAGED_PROFILE_CONTACTS_ACCESS: i64 = 8;
    pub const EXECUTE_APP_FUNCTIONS: i64 = 9;

    /// Returns true if `id` names a permission this build can evaluate.
    #[must_use]
    pub fn is_supported(id: i64) -> bool {
        (READ_SMS..=EXECUTE_APP_FUNCTIONS).contains(&id)
    }
}

/// A package identity: name plus the SHA-256 digest of its signing
/// certificate. Matching is by name equality and certificate verification
/// against the platform's current-or-rotated signing history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
    pub package_name: String,
    pub sha256_certificate: Vec<u8>,
}

impl PackageIdentifier {
    #[must_use]
    pub fn new(package_name: impl Into<String>, sha256_certificate: Vec<u8>) -> Self {
        Self {
            package_name: package_name.into(),
            sha256_certificate,
        }
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.package_name,
            hex::encode(&self.sha256_certificate)
        )
    }
}

/// One group of visibility criteria.
///
/// In a policy's `visible_to` position the three criteria kinds are
/// OR-evaluated; in a `visible_to_configs` entry every *specified* kind must
/// match (AND). A group that specifies no criteria at all can never grant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityCriteria {
    /// Packages allowed to see the schema type (with certificate check).
    pub allowed_packages: Vec<PackageIdentifier>,
    /// Permission requirements: OR across sets, AND within one set.
    pub required_permissions: BTreeSet<BTreeSet<i64>>,
    /// Public-visibility delegation target: the schema is visible to any
    /// caller that the platform says may query this package.
    pub publicly_visible_target_package: Option<PackageIdentifier>,
}

impl VisibilityCriteria {
    /// Returns true if no criterion of any kind is specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed_packages.is_empty()
            && self.required_permissions.is_empty()
            && self.publicly_visible_target_package.is_none()
    }
}

/// Stored access policy for one prefixed schema type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolicy {
    /// The prefixed schema type this policy governs.
    pub schema_type: String,
    /// When set, even callers with system access may not surface documents
    /// of this type on system UI surfaces.
    pub not_displayed_by_system: bool,
    /// OR-evaluated criteria: any single match grants access.
    pub visible_to: VisibilityCriteria,
    /// AND-evaluated groups: all criteria specified by one group must match.
    pub visible_to_configs: Vec<VisibilityCriteria>,
}

impl VisibilityPolicy {
    /// Creates a policy with no criteria (visible only to system access).
    #[must_use]
    pub fn new(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
            not_displayed_by_system: false,
            visible_to: VisibilityCriteria::default(),
            visible_to_configs: Vec::new(),
        }
    }
}

/// Identity of a caller, as resolved by the platform before any visibility
/// evaluation. The evaluator never re-derives these flags; package and
/// signature state can change at any time, so they are resolved fresh per
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerAccess {
    pub calling_package_name: String,
    /// Caller holds system-level read access (e.g. system UI intelligence).
    pub has_system_access: bool,
    /// Caller operates in a managed-profile (enterprise) session.
    pub is_for_enterprise: bool,
}

impl CallerAccess {
    /// Creates an ordinary caller with no elevated access.
    #[must_use]
    pub fn new(calling_package_name: impl Into<String>) -> Self {
        Self {
            calling_package_name: calling_package_name.into(),
            has_system_access: false,
            is_for_enterprise: false,
        }
    }

    /// Marks the caller as holding system-level read access.
    #[must_use]
    pub fn with_system_access(mut self) -> Self {
        self.has_system_access = true;
        self
    }

    /// Marks the caller as an enterprise (managed-profile) session.
    #[must_use]
    pub fn for_enterprise(mut self) -> Self {
        self.is_for_enterprise = true;
        self
    }
}
