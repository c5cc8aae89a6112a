//! Capability resolution.
//!
//! A capability is granted when any of these holds:
//! 1. the profile is a super admin,
//! 2. its admin role is in the capability's role set,
//! 3. `permissions[key]` is `true`.
//!
//! There are no deny rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use yaracheck_shared::AppError;

use super::profile::Profile;
use crate::auth::AdminRole;

/// Derived permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// List and search reports.
    ViewReports,
    /// Change report status.
    ManageReports,
    /// See the asset register.
    ViewAssets,
    /// Edit the asset register.
    ManageAssets,
    /// See ROI distributions and withdrawals.
    ViewRoi,
    /// Create distributions and process withdrawals.
    ManageRoi,
    /// Withdraw from one's own distributions.
    RequestWithdrawal,
    /// Create and edit staff accounts.
    ManageAdmins,
    /// See payment transactions.
    ViewTransactions,
    /// Work the support ticket queue.
    ManageSupport,
    /// Read anonymous messages.
    ViewMessages,
}

impl Capability {
    /// Every capability.
    pub const ALL: [Self; 11] = [
        Self::ViewReports,
        Self::ManageReports,
        Self::ViewAssets,
        Self::ManageAssets,
        Self::ViewRoi,
        Self::ManageRoi,
        Self::RequestWithdrawal,
        Self::ManageAdmins,
        Self::ViewTransactions,
        Self::ManageSupport,
        Self::ViewMessages,
    ];

    /// Returns the snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ViewReports => "view_reports",
            Self::ManageReports => "manage_reports",
            Self::ViewAssets => "view_assets",
            Self::ManageAssets => "manage_assets",
            Self::ViewRoi => "view_roi",
            Self::ManageRoi => "manage_roi",
            Self::RequestWithdrawal => "request_withdrawal",
            Self::ManageAdmins => "manage_admins",
            Self::ViewTransactions => "view_transactions",
            Self::ManageSupport => "manage_support",
            Self::ViewMessages => "view_messages",
        }
    }

    /// Returns the key looked up in the permissions map.
    #[must_use]
    pub const fn permission_key(&self) -> &'static str {
        match self {
            Self::ViewReports => "can_view_reports",
            Self::ManageReports => "can_manage_reports",
            Self::ViewAssets => "can_view_assets",
            Self::ManageAssets => "can_manage_assets",
            Self::ViewRoi => "can_view_roi",
            Self::ManageRoi => "can_manage_roi",
            Self::RequestWithdrawal => "can_request_withdrawal",
            Self::ManageAdmins => "can_manage_admins",
            Self::ViewTransactions => "can_view_transactions",
            Self::ManageSupport => "can_manage_support",
            Self::ViewMessages => "can_view_messages",
        }
    }

    /// Returns the admin roles that hold this capability implicitly.
    #[must_use]
    pub const fn admin_roles(&self) -> &'static [AdminRole] {
        use AdminRole::{
            CountryRep, CustomerSupportExecutive, Director, Investor, ProvinceManager, Shareholder,
        };
        match self {
            Self::ViewReports => &[Director, CountryRep, ProvinceManager, CustomerSupportExecutive],
            Self::ManageReports => &[Director, CountryRep, ProvinceManager],
            Self::ViewAssets | Self::ManageAssets | Self::ManageRoi | Self::ManageAdmins => {
                &[Director]
            }
            Self::ViewRoi => &[Director, Shareholder, Investor],
            Self::RequestWithdrawal => &[Shareholder, Investor],
            Self::ViewTransactions => &[Director, CountryRep],
            Self::ManageSupport => &[Director, CustomerSupportExecutive],
            Self::ViewMessages => &[CustomerSupportExecutive],
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if the profile holds the capability.
#[must_use]
pub fn has(profile: &Profile, capability: Capability) -> bool {
    profile.is_super_admin()
        || profile
            .admin_role
            .is_some_and(|r| capability.admin_roles().contains(&r))
        || profile.has_permission_flag(capability.permission_key())
}

/// Fails with `Forbidden` unless the profile holds the capability.
pub fn require(profile: &Profile, capability: Capability) -> Result<(), AppError> {
    if has(profile, capability) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Missing capability: {capability}"
        )))
    }
}

/// Evaluates every capability, keyed by name.
#[must_use]
pub fn resolve_all(profile: &Profile) -> BTreeMap<&'static str, bool> {
    Capability::ALL
        .into_iter()
        .map(|c| (c.as_str(), has(profile, c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use rstest::rstest;
    use serde_json::json;
    use yaracheck_shared::types::ProfileId;

    fn admin(role: AdminRole) -> Profile {
        Profile::new(ProfileId::new(), Role::Admin).with_admin_role(role)
    }

    #[test]
    fn test_super_admin_has_everything() {
        let profile = Profile::new(ProfileId::new(), Role::SuperAdmin);
        assert!(Capability::ALL.into_iter().all(|c| has(&profile, c)));
    }

    #[test]
    fn test_plain_user_has_nothing() {
        let profile = Profile::new(ProfileId::new(), Role::User);
        assert!(Capability::ALL.into_iter().all(|c| !has(&profile, c)));
    }

    #[rstest]
    #[case(AdminRole::Director, Capability::ViewAssets, true)]
    #[case(AdminRole::Director, Capability::ViewMessages, false)]
    #[case(AdminRole::CountryRep, Capability::ViewTransactions, true)]
    #[case(AdminRole::CountryRep, Capability::ViewAssets, false)]
    #[case(AdminRole::ProvinceManager, Capability::ManageReports, true)]
    #[case(AdminRole::ProvinceManager, Capability::ViewTransactions, false)]
    #[case(AdminRole::Shareholder, Capability::ViewRoi, true)]
    #[case(AdminRole::Shareholder, Capability::RequestWithdrawal, true)]
    #[case(AdminRole::Shareholder, Capability::ViewAssets, false)]
    #[case(AdminRole::Shareholder, Capability::ManageRoi, false)]
    #[case(AdminRole::Investor, Capability::RequestWithdrawal, true)]
    #[case(AdminRole::CustomerSupportExecutive, Capability::ViewReports, true)]
    #[case(AdminRole::CustomerSupportExecutive, Capability::ManageReports, false)]
    #[case(AdminRole::CustomerSupportExecutive, Capability::ViewMessages, true)]
    fn test_role_defaults(
        #[case] role: AdminRole,
        #[case] capability: Capability,
        #[case] expected: bool,
    ) {
        assert_eq!(has(&admin(role), capability), expected);
    }

    #[test]
    fn test_permission_flag_grants_capability() {
        let profile =
            admin(AdminRole::Shareholder).with_permission("can_view_assets", json!(true));
        assert!(has(&profile, Capability::ViewAssets));
        assert!(!has(&profile, Capability::ManageAssets));
    }

    #[test]
    fn test_false_flag_does_not_revoke_role_default() {
        let profile = admin(AdminRole::Director).with_permission("can_view_assets", json!(false));
        assert!(has(&profile, Capability::ViewAssets));
    }

    #[test]
    fn test_require() {
        let profile = admin(AdminRole::Investor);
        assert!(require(&profile, Capability::ViewRoi).is_ok());
        let err = require(&profile, Capability::ManageRoi).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn test_resolve_all_lists_every_capability() {
        let map = resolve_all(&admin(AdminRole::CountryRep));
        assert_eq!(map.len(), Capability::ALL.len());
        assert_eq!(map.get("view_reports"), Some(&true));
        assert_eq!(map.get("manage_roi"), Some(&false));
    }
}
