//! Account roles and credentials.
//!
//! This module provides:
//! - Coarse roles and fine-grained admin roles
//! - The password policy with Argon2id hashing and verification

mod credentials;

pub use credentials::{
    MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, PasswordError, check_policy, hash_password,
    verify_password,
};

use serde::{Deserialize, Serialize};

/// Coarse account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Member of the public submitting reports.
    User,
    /// Staff member; powers come from `admin_role` and permissions.
    Admin,
    /// Unrestricted.
    SuperAdmin,
}

impl Role {
    /// Returns the string stored in the database and in JWT claims.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parses a role; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// Returns true for admins and super admins.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained staff role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Company-wide operations lead.
    Director,
    /// Runs one country.
    CountryRep,
    /// Runs one province.
    ProvinceManager,
    /// Receives ROI distributions.
    Shareholder,
    /// Handles support tickets and messages.
    CustomerSupportExecutive,
    /// Receives ROI distributions.
    Investor,
}

impl AdminRole {
    /// Returns the string stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::CountryRep => "country_rep",
            Self::ProvinceManager => "province_manager",
            Self::Shareholder => "shareholder",
            Self::CustomerSupportExecutive => "customer_support_executive",
            Self::Investor => "investor",
        }
    }

    /// Parses an admin role; unknown values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "director" => Some(Self::Director),
            "country_rep" => Some(Self::CountryRep),
            "province_manager" => Some(Self::ProvinceManager),
            "shareholder" => Some(Self::Shareholder),
            "customer_support_executive" => Some(Self::CustomerSupportExecutive),
            "investor" => Some(Self::Investor),
            _ => None,
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::User, Role::Admin, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("owner"), None);
        assert!(Role::SuperAdmin.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_admin_role_round_trip() {
        for role in [
            AdminRole::Director,
            AdminRole::CountryRep,
            AdminRole::ProvinceManager,
            AdminRole::Shareholder,
            AdminRole::CustomerSupportExecutive,
            AdminRole::Investor,
        ] {
            assert_eq!(AdminRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(AdminRole::parse("janitor"), None);
    }
}
