//! Typed capability set for role-based authorization.
//!
//! Roles store their capabilities as a JSON array of strings. This module is
//! the single typed view of that data: [`PermissionSet::from_json`] parses
//! leniently (malformed data yields an empty set, never an error) and
//! handlers check capabilities through one interface instead of scattering
//! string comparisons.

use serde::{Deserialize, Serialize};

/// A single capability a role can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageProducts,
    ManageCategories,
    ManageOrders,
    ManagePromotions,
    ManageUsers,
    ManageCustomers,
    ManageReviews,
    ManageWidgets,
    ViewAnalytics,
}

impl Permission {
    /// Every capability, used to seed the super-admin role.
    pub const ALL: [Self; 9] = [
        Self::ManageProducts,
        Self::ManageCategories,
        Self::ManageOrders,
        Self::ManagePromotions,
        Self::ManageUsers,
        Self::ManageCustomers,
        Self::ManageReviews,
        Self::ManageWidgets,
        Self::ViewAnalytics,
    ];

    /// The stored string form of this capability.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageProducts => "manage_products",
            Self::ManageCategories => "manage_categories",
            Self::ManageOrders => "manage_orders",
            Self::ManagePromotions => "manage_promotions",
            Self::ManageUsers => "manage_users",
            Self::ManageCustomers => "manage_customers",
            Self::ManageReviews => "manage_reviews",
            Self::ManageWidgets => "manage_widgets",
            Self::ViewAnalytics => "view_analytics",
        }
    }

    /// Parse a stored capability string. Unknown strings yield `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manage_products" => Some(Self::ManageProducts),
            "manage_categories" => Some(Self::ManageCategories),
            "manage_orders" => Some(Self::ManageOrders),
            "manage_promotions" => Some(Self::ManagePromotions),
            "manage_users" => Some(Self::ManageUsers),
            "manage_customers" => Some(Self::ManageCustomers),
            "manage_reviews" => Some(Self::ManageReviews),
            "manage_widgets" => Some(Self::ManageWidgets),
            "view_analytics" => Some(Self::ViewAnalytics),
            _ => None,
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of capabilities attached to an authenticated identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(Vec<Permission>);

impl PermissionSet {
    /// An empty set (no capabilities).
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// A set containing every capability.
    #[must_use]
    pub fn all() -> Self {
        Self(Permission::ALL.to_vec())
    }

    /// Parse a permission set from the stored JSON value.
    ///
    /// Lenient by contract: anything that is not a JSON array of known
    /// capability strings contributes nothing, and the result is never an
    /// error. Unknown capability strings are skipped.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(items) = value.as_array() else {
            return Self::empty();
        };

        let mut permissions: Vec<Permission> = items
            .iter()
            .filter_map(|item| item.as_str())
            .filter_map(Permission::parse)
            .collect();
        permissions.sort_by_key(|p| p.as_str());
        permissions.dedup();
        Self(permissions)
    }

    /// Parse a permission set from a raw JSON string (e.g. a text column).
    ///
    /// Malformed JSON yields the empty set.
    #[must_use]
    pub fn from_json_str(raw: &str) -> Self {
        serde_json::from_str::<serde_json::Value>(raw)
            .map_or_else(|_| Self::empty(), |value| Self::from_json(&value))
    }

    /// Whether this set grants the given capability.
    #[must_use]
    pub fn contains(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The capabilities as stored strings, for API responses.
    #[must_use]
    pub fn as_strings(&self) -> Vec<&'static str> {
        self.0.iter().map(|p| p.as_str()).collect()
    }

    /// Iterate over the granted capabilities.
    pub fn iter(&self) -> impl Iterator<Item = Permission> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = Permission>>(iter: T) -> Self {
        let mut permissions: Vec<Permission> = iter.into_iter().collect();
        permissions.sort_by_key(|p| p.as_str());
        permissions.dedup();
        Self(permissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_known_capabilities() {
        let set = PermissionSet::from_json(&json!(["manage_orders", "view_analytics"]));
        assert!(set.contains(Permission::ManageOrders));
        assert!(set.contains(Permission::ViewAnalytics));
        assert!(!set.contains(Permission::ManageUsers));
    }

    #[test]
    fn test_from_json_skips_unknown_strings() {
        let set = PermissionSet::from_json(&json!(["manage_orders", "fly_to_moon", 42]));
        assert!(set.contains(Permission::ManageOrders));
        assert_eq!(set.as_strings(), vec!["manage_orders"]);
    }

    #[test]
    fn test_from_json_non_array_is_empty() {
        assert!(PermissionSet::from_json(&json!("manage_orders")).is_empty());
        assert!(PermissionSet::from_json(&json!({"x": 1})).is_empty());
        assert!(PermissionSet::from_json(&json!(null)).is_empty());
    }

    #[test]
    fn test_from_json_str_malformed_is_empty() {
        assert!(PermissionSet::from_json_str("not json at all").is_empty());
        assert!(PermissionSet::from_json_str("").is_empty());
    }

    #[test]
    fn test_dedup() {
        let set = PermissionSet::from_json(&json!(["manage_orders", "manage_orders"]));
        assert_eq!(set.as_strings(), vec!["manage_orders"]);
    }

    #[test]
    fn test_all_round_trips() {
        for permission in Permission::ALL {
            assert_eq!(Permission::parse(permission.as_str()), Some(permission));
        }
    }

    #[test]
    fn test_serde_transparent() {
        let set = PermissionSet::from_json(&json!(["view_analytics"]));
        let json = serde_json::to_string(&set).expect("serialize");
        assert_eq!(json, "[\"view_analytics\"]");
    }
}
