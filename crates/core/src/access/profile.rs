//! The slice of a profile that access decisions read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use yaracheck_shared::types::{CountryId, ProfileId, ProvinceId};

use crate::auth::{AdminRole, Role};

/// Access-relevant view of a stored profile.
///
/// Rebuilt from the database on every request; capabilities are never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile ID.
    pub id: ProfileId,
    /// Coarse role.
    pub role: Role,
    /// Fine-grained staff role.
    pub admin_role: Option<AdminRole>,
    /// Free-form `key -> bool` grants.
    #[serde(default)]
    pub permissions: Map<String, Value>,
    /// Assigned country.
    pub country_id: Option<CountryId>,
    /// Assigned province.
    pub province_id: Option<ProvinceId>,
}

impl Profile {
    /// Creates a profile with no admin role, grants or assignment.
    #[must_use]
    pub fn new(id: ProfileId, role: Role) -> Self {
        Self {
            id,
            role,
            admin_role: None,
            permissions: Map::new(),
            country_id: None,
            province_id: None,
        }
    }

    /// Sets the admin role.
    #[must_use]
    pub fn with_admin_role(mut self, admin_role: AdminRole) -> Self {
        self.admin_role = Some(admin_role);
        self
    }

    /// Adds a permission entry.
    #[must_use]
    pub fn with_permission(mut self, key: &str, value: Value) -> Self {
        self.permissions.insert(key.to_string(), value);
        self
    }

    /// Sets the assigned country.
    #[must_use]
    pub fn in_country(mut self, country_id: CountryId) -> Self {
        self.country_id = Some(country_id);
        self
    }

    /// Sets the assigned province.
    #[must_use]
    pub fn in_province(mut self, province_id: ProvinceId) -> Self {
        self.province_id = Some(province_id);
        self
    }

    /// Returns true if the role is super admin.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Returns true only when `permissions[key]` is the JSON boolean `true`.
    #[must_use]
    pub fn has_permission_flag(&self, key: &str) -> bool {
        matches!(self.permissions.get(key), Some(Value::Bool(true)))
    }

    /// Parses a stored permissions column. Anything but a JSON object is empty.
    #[must_use]
    pub fn permissions_from_json(value: Option<Value>) -> Map<String, Value> {
        match value {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_permission_flag_requires_true_bool() {
        let profile = Profile::new(ProfileId::new(), Role::Admin)
            .with_permission("a", json!(true))
            .with_permission("b", json!("true"))
            .with_permission("c", json!(1))
            .with_permission("d", json!(false));

        assert!(profile.has_permission_flag("a"));
        assert!(!profile.has_permission_flag("b"));
        assert!(!profile.has_permission_flag("c"));
        assert!(!profile.has_permission_flag("d"));
        assert!(!profile.has_permission_flag("missing"));
    }

    #[test]
    fn test_permissions_from_json() {
        let map = Profile::permissions_from_json(Some(json!({"can_view_roi": true})));
        assert_eq!(map.len(), 1);
        assert!(Profile::permissions_from_json(Some(json!([1, 2]))).is_empty());
        assert!(Profile::permissions_from_json(None).is_empty());
    }
}
