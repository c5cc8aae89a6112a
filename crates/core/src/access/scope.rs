//! Geographic scoping of admin queries.
//!
//! Resolution is two-step because a province-only assignment needs one
//! lookup (province -> country) that only the database can answer:
//!
//! ```text
//! resolve(profile) ── Resolved(scope)
//!                 └── ViaProvince(id) ── db lookup ── finish(country?)
//! ```

use serde::Serialize;
use yaracheck_shared::types::{CountryId, ProvinceId};

use super::profile::Profile;
use crate::auth::AdminRole;

/// Which rows an admin may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "country_id", rename_all = "snake_case")]
pub enum GeoScope {
    /// No filter.
    Unrestricted,
    /// Only rows in this country.
    Country(CountryId),
    /// No rows at all.
    Nothing,
}

impl GeoScope {
    /// Returns true if a row with this country is visible.
    #[must_use]
    pub fn allows(&self, country_id: Option<CountryId>) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Country(c) => country_id == Some(*c),
            Self::Nothing => false,
        }
    }
}

/// First step of scope resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeResolution {
    /// Fully resolved.
    Resolved(GeoScope),
    /// The country of this province must be looked up.
    ViaProvince(ProvinceId),
}

impl ScopeResolution {
    /// Completes resolution with the looked-up country of the province.
    /// A missing province yields [`GeoScope::Nothing`].
    #[must_use]
    pub fn finish(self, province_country: Option<CountryId>) -> GeoScope {
        match self {
            Self::Resolved(scope) => scope,
            Self::ViaProvince(_) => province_country.map_or(GeoScope::Nothing, GeoScope::Country),
        }
    }
}

/// Starts scope resolution for a profile.
#[must_use]
pub fn resolve(profile: &Profile) -> ScopeResolution {
    if profile.is_super_admin() || profile.admin_role == Some(AdminRole::Director) {
        return ScopeResolution::Resolved(GeoScope::Unrestricted);
    }
    match (profile.country_id, profile.province_id) {
        (Some(country), _) => ScopeResolution::Resolved(GeoScope::Country(country)),
        (None, Some(province)) => ScopeResolution::ViaProvince(province),
        (None, None) => ScopeResolution::Resolved(GeoScope::Nothing),
    }
}
