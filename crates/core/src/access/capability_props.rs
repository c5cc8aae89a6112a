//! Property-based tests for capability resolution.

use proptest::prelude::*;
use serde_json::{Value, json};
use yaracheck_shared::types::ProfileId;

use super::capability::{Capability, has};
use super::profile::Profile;
use crate::auth::{AdminRole, Role};

fn arb_role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![Role::User, Role::Admin, Role::SuperAdmin])
}

fn arb_admin_role() -> impl Strategy<Value = Option<AdminRole>> {
    prop::option::of(prop::sample::select(vec![
        AdminRole::Director,
        AdminRole::CountryRep,
        AdminRole::ProvinceManager,
        AdminRole::Shareholder,
        AdminRole::CustomerSupportExecutive,
        AdminRole::Investor,
    ]))
}

fn arb_capability() -> impl Strategy<Value = Capability> {
    prop::sample::select(Capability::ALL.to_vec())
}

fn arb_flag_value() -> impl Strategy<Value = Option<Value>> {
    prop::option::of(prop_oneof![
        Just(json!(true)),
        Just(json!(false)),
        Just(json!("true")),
        Just(json!(1)),
        Just(Value::Null),
    ])
}

proptest! {
    /// The decision equals the OR of its three sources.
    #[test]
    fn prop_has_is_or_of_sources(
        role in arb_role(),
        admin_role in arb_admin_role(),
        capability in arb_capability(),
        flag in arb_flag_value(),
    ) {
        let mut profile = Profile::new(ProfileId::new(), role);
        profile.admin_role = admin_role;
        if let Some(v) = flag.clone() {
            profile = profile.with_permission(capability.permission_key(), v);
        }

        let expected = role == Role::SuperAdmin
            || admin_role.is_some_and(|r| capability.admin_roles().contains(&r))
            || flag == Some(json!(true));

        prop_assert_eq!(has(&profile, capability), expected);
    }

    /// Adding a `true` flag never takes a capability away.
    #[test]
    fn prop_grants_are_monotonic(
        role in arb_role(),
        admin_role in arb_admin_role(),
        capability in arb_capability(),
        other in arb_capability(),
    ) {
        let mut profile = Profile::new(ProfileId::new(), role);
        profile.admin_role = admin_role;
        let before = has(&profile, capability);

        let granted = profile.with_permission(other.permission_key(), json!(true));
        prop_assert!(!before || has(&granted, capability));
        prop_assert!(has(&granted, other));
    }
}
