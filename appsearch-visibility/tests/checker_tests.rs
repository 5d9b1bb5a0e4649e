use appsearch_types::visibility::permission;
use appsearch_types::{
    CallerAccess, PackageIdentifier, VisibilityCriteria, VisibilityPolicy,
};
use appsearch_visibility::{
    is_schema_searchable_by_caller, resolve_caller_access, PackageAuthority, VisibilityError,
    VisibilityPolicySource, VISIBILITY_PACKAGE_NAME,
};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap, HashSet};

const OWNER_PKG: &str = "com.example.owner";
const SCHEMA: &str = "com.example.owner$db1/Email";
const CALLER_PKG: &str = "com.example.caller";

fn digest_for(package: &str) -> Vec<u8> {
    Sha256::digest(package.as_bytes()).to_vec()
}

/// Policy source backed by a plain map.
#[derive(Default)]
struct MapPolicySource {
    policies: HashMap<String, VisibilityPolicy>,
}

impl MapPolicySource {
    fn with(policy: VisibilityPolicy) -> Self {
        let mut source = Self::default();
        source.policies.insert(policy.schema_type.clone(), policy);
        source
    }
}

impl VisibilityPolicySource for MapPolicySource {
    fn policy_for(&self, prefixed_schema_type: &str) -> Option<VisibilityPolicy> {
        self.policies.get(prefixed_schema_type).cloned()
    }
}

/// Authority whose answers are driven by explicit fixture state.
#[derive(Default)]
struct FakeAuthority {
    /// Packages whose stored digest matches their current signing cert.
    valid_certificates: HashSet<String>,
    /// (package, permission id, enterprise flag) grants.
    granted: HashSet<(String, i64, bool)>,
    /// (caller, target) pairs visible to canPackageQuery.
    queryable: HashSet<(String, String)>,
}

impl FakeAuthority {
    fn grant(&mut self, package: &str, permission_id: i64, for_enterprise: bool) {
        self.granted
            .insert((package.to_string(), permission_id, for_enterprise));
    }

    fn trust_certificate(&mut self, package: &str) {
        self.valid_certificates.insert(package.to_string());
    }

    fn allow_query(&mut self, caller: &str, target: &str) {
        self.queryable
            .insert((caller.to_string(), target.to_string()));
    }
}

impl PackageAuthority for FakeAuthority {
    fn verify_signing_certificate(&self, package: &PackageIdentifier) -> bool {
        self.valid_certificates.contains(&package.package_name)
            && package.sha256_certificate == digest_for(&package.package_name)
    }

    fn is_permission_granted(
        &self,
        permission_id: i64,
        caller: &CallerAccess,
        for_enterprise: bool,
    ) -> bool {
        self.granted.contains(&(
            caller.calling_package_name.clone(),
            permission_id,
            for_enterprise,
        ))
    }

    fn can_package_query(&self, calling_package: &str, target_package: &str) -> bool {
        self.queryable
            .contains(&(calling_package.to_string(), target_package.to_string()))
    }

    fn has_system_access(&self, package_name: &str) -> bool {
        package_name == "android"
    }
}

fn permission_sets(sets: &[&[i64]]) -> BTreeSet<BTreeSet<i64>> {
    sets.iter()
        .map(|set| set.iter().copied().collect())
        .collect()
}

fn caller() -> CallerAccess {
    CallerAccess::new(CALLER_PKG)
}

fn check(
    caller: &CallerAccess,
    source: &MapPolicySource,
    authority: &FakeAuthority,
) -> Result<bool, VisibilityError> {
    is_schema_searchable_by_caller(caller, OWNER_PKG, SCHEMA, source, authority)
}

// ── Default deny and system access ───────────────────────────────

#[test]
fn no_policy_denies_ordinary_caller() {
    let source = MapPolicySource::default();
    let authority = FakeAuthority::default();
    assert_eq!(check(&caller(), &source, &authority), Ok(false));
}

#[test]
fn no_policy_allows_system_access() {
    let source = MapPolicySource::default();
    let authority = FakeAuthority::default();
    let system = caller().with_system_access();
    assert_eq!(check(&system, &source, &authority), Ok(true));
}

#[test]
fn not_displayed_by_system_blocks_system_access() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.not_displayed_by_system = true;
    let source = MapPolicySource::with(policy);
    let authority = FakeAuthority::default();
    let system = caller().with_system_access();
    assert_eq!(check(&system, &source, &authority), Ok(false));
}

#[test]
fn internal_visibility_types_are_never_visible() {
    let source = MapPolicySource::default();
    let authority = FakeAuthority::default();
    let system = caller().with_system_access();
    let result = is_schema_searchable_by_caller(
        &system,
        VISIBILITY_PACKAGE_NAME,
        "VS#Pkg$VS#Db/VisibilityType",
        &source,
        &authority,
    );
    assert_eq!(result, Ok(false));
}

#[test]
fn resolved_caller_carries_fresh_system_access() {
    let authority = FakeAuthority::default();
    let system = resolve_caller_access("android", false, &authority);
    assert!(system.has_system_access);
    let ordinary = resolve_caller_access(CALLER_PKG, false, &authority);
    assert!(!ordinary.has_system_access);

    // The resolved identity feeds straight into evaluation.
    let source = MapPolicySource::default();
    assert_eq!(check(&system, &source, &authority), Ok(true));
    assert_eq!(check(&ordinary, &source, &authority), Ok(false));
}

// ── OR-criteria ──────────────────────────────────────────────────

#[test]
fn package_allow_list_with_valid_certificate_grants() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy
        .visible_to
        .allowed_packages
        .push(PackageIdentifier::new(CALLER_PKG, digest_for(CALLER_PKG)));
    let source = MapPolicySource::with(policy);
    let mut authority = FakeAuthority::default();
    authority.trust_certificate(CALLER_PKG);

    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

#[test]
fn package_allow_list_with_wrong_certificate_denies() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy
        .visible_to
        .allowed_packages
        .push(PackageIdentifier::new(CALLER_PKG, vec![0u8; 32]));
    let source = MapPolicySource::with(policy);
    let mut authority = FakeAuthority::default();
    authority.trust_certificate(CALLER_PKG);

    assert_eq!(check(&caller(), &source, &authority), Ok(false));
}

#[test]
fn permission_set_requires_all_members() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to.required_permissions =
        permission_sets(&[&[permission::READ_SMS, permission::READ_CONTACTS]]);
    let source = MapPolicySource::with(policy);

    let mut authority = FakeAuthority::default();
    authority.grant(CALLER_PKG, permission::READ_SMS, false);
    assert_eq!(check(&caller(), &source, &authority), Ok(false));

    authority.grant(CALLER_PKG, permission::READ_CONTACTS, false);
    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

#[test]
fn permission_sets_are_evaluated_independently() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to.required_permissions = permission_sets(&[
        &[permission::READ_SMS, permission::READ_CALENDAR],
        &[permission::READ_CONTACTS],
    ]);
    let source = MapPolicySource::with(policy);

    // Satisfies only the second set.
    let mut authority = FakeAuthority::default();
    authority.grant(CALLER_PKG, permission::READ_CONTACTS, false);
    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

#[test]
fn unsupported_permission_is_a_hard_error() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to.required_permissions =
        permission_sets(&[&[permission::READ_CONTACTS], &[9999]]);
    let source = MapPolicySource::with(policy);

    // Even a caller who satisfies the supported set gets the error: the
    // policy as a whole cannot be evaluated safely.
    let mut authority = FakeAuthority::default();
    authority.grant(CALLER_PKG, permission::READ_CONTACTS, false);
    assert_eq!(
        check(&caller(), &source, &authority),
        Err(VisibilityError::UnsupportedPermission(9999))
    );
}

#[test]
fn public_visibility_requires_certificate_and_query_access() {
    let target = "com.example.target";
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to.publicly_visible_target_package =
        Some(PackageIdentifier::new(target, digest_for(target)));
    let source = MapPolicySource::with(policy);

    // Certificate valid but caller may not query the target.
    let mut authority = FakeAuthority::default();
    authority.trust_certificate(target);
    assert_eq!(check(&caller(), &source, &authority), Ok(false));

    // Both conditions hold.
    authority.allow_query(CALLER_PKG, target);
    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

// ── AND-groups ───────────────────────────────────────────────────

#[test]
fn and_group_is_all_or_nothing() {
    // Package criterion satisfied, permission criterion not: the group
    // denies, even though the same package criterion alone in OR position
    // would have granted.
    let mut group = VisibilityCriteria::default();
    group
        .allowed_packages
        .push(PackageIdentifier::new(CALLER_PKG, digest_for(CALLER_PKG)));
    group.required_permissions = permission_sets(&[&[permission::READ_SMS]]);

    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to_configs.push(group.clone());
    let source = MapPolicySource::with(policy);

    let mut authority = FakeAuthority::default();
    authority.trust_certificate(CALLER_PKG);
    assert_eq!(check(&caller(), &source, &authority), Ok(false));

    // Same single criterion in OR position grants.
    let mut or_policy = VisibilityPolicy::new(SCHEMA);
    or_policy.visible_to.allowed_packages = group.allowed_packages.clone();
    let source = MapPolicySource::with(or_policy);
    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

#[test]
fn and_group_with_all_criteria_satisfied_grants() {
    let target = "com.example.target";
    let mut group = VisibilityCriteria::default();
    group
        .allowed_packages
        .push(PackageIdentifier::new(CALLER_PKG, digest_for(CALLER_PKG)));
    group.required_permissions = permission_sets(&[&[permission::READ_SMS]]);
    group.publicly_visible_target_package =
        Some(PackageIdentifier::new(target, digest_for(target)));

    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to_configs.push(group);
    let source = MapPolicySource::with(policy);

    let mut authority = FakeAuthority::default();
    authority.trust_certificate(CALLER_PKG);
    authority.trust_certificate(target);
    authority.grant(CALLER_PKG, permission::READ_SMS, false);
    authority.allow_query(CALLER_PKG, target);

    assert_eq!(check(&caller(), &source, &authority), Ok(true));
}

#[test]
fn and_group_with_no_criteria_never_grants() {
    // Recorded decision: a vacuous AND-group stays false rather than
    // granting everyone access. Revisit against product intent if a policy
    // writer ever produces one deliberately.
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to_configs.push(VisibilityCriteria::default());
    let source = MapPolicySource::with(policy);
    let authority = FakeAuthority::default();

    assert_eq!(check(&caller(), &source, &authority), Ok(false));
}

// ── Enterprise sessions ──────────────────────────────────────────

#[test]
fn enterprise_without_policy_denies_even_system() {
    let source = MapPolicySource::default();
    let authority = FakeAuthority::default();
    let enterprise_system = caller().with_system_access().for_enterprise();
    assert_eq!(check(&enterprise_system, &source, &authority), Ok(false));
}

#[test]
fn enterprise_requires_enterprise_permission_grant() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy.visible_to.required_permissions =
        permission_sets(&[&[permission::MANAGED_PROFILE_CONTACTS_ACCESS]]);
    let source = MapPolicySource::with(policy);

    // Grant held only under the non-enterprise evaluation: denied.
    let mut authority = FakeAuthority::default();
    authority.grant(CALLER_PKG, permission::MANAGED_PROFILE_CONTACTS_ACCESS, false);
    let enterprise = caller().for_enterprise();
    assert_eq!(check(&enterprise, &source, &authority), Ok(false));

    // Enterprise evaluation of the same permission: granted.
    authority.grant(CALLER_PKG, permission::MANAGED_PROFILE_CONTACTS_ACCESS, true);
    assert_eq!(check(&enterprise, &source, &authority), Ok(true));
}

#[test]
fn enterprise_ignores_package_allow_list() {
    let mut policy = VisibilityPolicy::new(SCHEMA);
    policy
        .visible_to
        .allowed_packages
        .push(PackageIdentifier::new(CALLER_PKG, digest_for(CALLER_PKG)));
    let source = MapPolicySource::with(policy);
    let mut authority = FakeAuthority::default();
    authority.trust_certificate(CALLER_PKG);

    let enterprise = caller().for_enterprise();
    assert_eq!(check(&enterprise, &source, &authority), Ok(false));
}
