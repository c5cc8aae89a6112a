//! Landing dashboard selection.

use serde::{Deserialize, Serialize};

use super::capability::{Capability, has};
use super::profile::Profile;
use crate::auth::{AdminRole, Role};

/// Which dashboard the client should open after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dashboard {
    /// Full control panel.
    SuperAdmin,
    /// ROI balances and withdrawals.
    Shareholder,
    /// Staff report queues.
    Admin,
    /// The submitter's own reports.
    User,
}

/// Picks the landing dashboard for a profile.
///
/// Shareholders land on their own dashboard unless they were granted asset
/// visibility, in which case they get the regular admin one.
#[must_use]
pub fn landing_dashboard(profile: &Profile) -> Dashboard {
    match profile.role {
        Role::SuperAdmin => Dashboard::SuperAdmin,
        Role::Admin
            if profile.admin_role == Some(AdminRole::Shareholder)
                && !has(profile, Capability::ViewAssets) =>
        {
            Dashboard::Shareholder
        }
        Role::Admin => Dashboard::Admin,
        Role::User => Dashboard::User,
    }
}
