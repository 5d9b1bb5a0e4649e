//! The visibility decision procedure.

use crate::authority::{PackageAuthority, VisibilityPolicySource};
use crate::error::VisibilityError;
use crate::VISIBILITY_PACKAGE_NAME;
use appsearch_types::visibility::permission;
use appsearch_types::{CallerAccess, PackageIdentifier, VisibilityCriteria};
use std::collections::BTreeSet;
use tracing::debug;

/// Decides whether `caller` may observe documents of `prefixed_schema_type`,
/// which belongs to `package_name`.
///
/// Decision order:
/// 1. The visibility store's own bookkeeping types are never visible.
/// 2. Enterprise callers have exactly one path: a stored policy whose
///    permission requirements they satisfy under the enterprise evaluation.
///    System access does not bypass this.
/// 3. Without a stored policy the type defaults to system-only access.
/// 4. With a policy: system access (unless the type is hidden from system
///    surfaces), any OR-criterion match, or one fully-satisfied AND-group.
///
/// Returns an error only on a policy that cannot be evaluated safely
/// (unsupported permission id); access is never granted in that case.
pub fn is_schema_searchable_by_caller(
    caller: &CallerAccess,
    package_name: &str,
    prefixed_schema_type: &str,
    policies: &dyn VisibilityPolicySource,
    authority: &dyn PackageAuthority,
) -> Result<bool, VisibilityError> {
    if package_name == VISIBILITY_PACKAGE_NAME {
        return Ok(false);
    }

    if caller.is_for_enterprise {
        return match policies.policy_for(prefixed_schema_type) {
            Some(policy) => matches_permission_sets(
                caller,
                &policy.visible_to.required_permissions,
                authority,
                true,
            ),
            None => Ok(false),
        };
    }

    let Some(policy) = policies.policy_for(prefixed_schema_type) else {
        // Default deny: unregistered types are visible only to the system.
        return Ok(caller.has_system_access);
    };

    if caller.has_system_access && !policy.not_displayed_by_system {
        return Ok(true);
    }

    if matches_any_or_criterion(caller, &policy.visible_to, authority)? {
        return Ok(true);
    }

    for group in &policy.visible_to_configs {
        if matches_and_group(caller, group, authority)? {
            return Ok(true);
        }
    }

    debug!(
        schema_type = prefixed_schema_type,
        caller = %caller.calling_package_name,
        "visibility denied"
    );
    Ok(false)
}

/// Resolves a caller's identity immediately before evaluation.
///
/// System access is re-queried on every call; it can be granted or revoked
/// between requests and must never be cached on the caller object.
#[must_use]
pub fn resolve_caller_access(
    calling_package_name: &str,
    is_for_enterprise: bool,
    authority: &dyn PackageAuthority,
) -> CallerAccess {
    CallerAccess {
        calling_package_name: calling_package_name.to_string(),
        has_system_access: authority.has_system_access(calling_package_name),
        is_for_enterprise,
    }
}

/// OR evaluation: any single specified criterion grants access.
fn matches_any_or_criterion(
    caller: &CallerAccess,
    criteria: &VisibilityCriteria,
    authority: &dyn PackageAuthority,
) -> Result<bool, VisibilityError> {
    if matches_package_allow_list(caller, &criteria.allowed_packages, authority) {
        return Ok(true);
    }
    if matches_permission_sets(caller, &criteria.required_permissions, authority, false)? {
        return Ok(true);
    }
    if let Some(target) = &criteria.publicly_visible_target_package {
        if matches_public_target(caller, target, authority) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// AND evaluation: every criterion kind the group specifies must match.
/// A group that specifies no criteria never grants access.
fn matches_and_group(
    caller: &CallerAccess,
    group: &VisibilityCriteria,
    authority: &dyn PackageAuthority,
) -> Result<bool, VisibilityError> {
    let mut passed_any = false;

    if !group.allowed_packages.is_empty() {
        if !matches_package_allow_list(caller, &group.allowed_packages, authority) {
            return Ok(false);
        }
        passed_any = true;
    }

    if !group.required_permissions.is_empty() {
        if !matches_permission_sets(caller, &group.required_permissions, authority, false)? {
            return Ok(false);
        }
        passed_any = true;
    }

    if let Some(target) = &group.publicly_visible_target_package {
        if !matches_public_target(caller, target, authority) {
            return Ok(false);
        }
        passed_any = true;
    }

    Ok(passed_any)
}

/// Package-identity match: name equality by app id, then certificate
/// verification against the platform's signing history.
fn matches_package_allow_list(
    caller: &CallerAccess,
    allowed: &[PackageIdentifier],
    authority: &dyn PackageAuthority,
) -> bool {
    allowed.iter().any(|package| {
        package.package_name == caller.calling_package_name
            && authority.verify_signing_certificate(package)
    })
}

/// Permission match: OR across sets, AND within a set.
///
/// Every id in a set is validated before the set is evaluated, so an
/// unsupported id fails the whole call even when a supported id earlier in
/// the set would already have disqualified it.
fn matches_permission_sets(
    caller: &CallerAccess,
    permission_sets: &BTreeSet<BTreeSet<i64>>,
    authority: &dyn PackageAuthority,
    for_enterprise: bool,
) -> Result<bool, VisibilityError> {
    for set in permission_sets {
        for &id in set {
            if !permission::is_supported(id) {
                return Err(VisibilityError::UnsupportedPermission(id));
            }
        }
    }

    Ok(permission_sets.iter().any(|set| {
        !set.is_empty()
            && set
                .iter()
                .all(|&id| authority.is_permission_granted(id, caller, for_enterprise))
    }))
}

/// Public-visibility delegation: the target package's certificate must
/// verify and the platform must confirm the caller may query the target.
fn matches_public_target(
    caller: &CallerAccess,
    target: &PackageIdentifier,
    authority: &dyn PackageAuthority,
) -> bool {
    authority.verify_signing_certificate(target)
        && authority.can_package_query(&caller.calling_package_name, &target.package_name)
}
