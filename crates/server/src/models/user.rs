//! User, role, and session token domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Email, Permission, PermissionSet, RoleId, TokenId, UserId};

use crate::error::AppError;

/// A back-office user account.
///
/// New registrations start pending (`is_active = false`) until an admin
/// approves them; a pending account can still log in and receives a token,
/// but the client routes it to the approval screen.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name (also accepted as a login identifier).
    pub name: String,
    /// Email address (login identifier, matched case-insensitively).
    pub email: Email,
    /// Assigned role, if any.
    pub role_id: Option<RoleId>,
    /// Whether the account has been approved by an admin.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A role: static reference data mapping a name to a capability set.
#[derive(Debug, Clone, Serialize)]
pub struct Role {
    /// Unique role ID. Id 1 is the distinguished super-admin role.
    pub id: RoleId,
    /// Machine name (e.g. `super_admin`).
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Capabilities granted by this role.
    pub permissions: PermissionSet,
}

/// An opaque session token. One row per session; a user may hold several.
#[derive(Debug, Clone, Serialize)]
pub struct ApiToken {
    /// Database ID of this token row.
    pub id: TokenId,
    /// Owning user.
    pub user_id: UserId,
    /// The opaque token string presented as `Authorization: Bearer <token>`.
    pub token: String,
    /// Expiry instant; `None` never expires.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
}

/// The authenticated identity attached to a request by the token auth gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub role_id: Option<RoleId>,
    pub role_name: Option<String>,
    pub is_active: bool,
    pub permissions: PermissionSet,
}

impl CurrentUser {
    /// Require a capability, rejecting with 403 when it is not granted.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Forbidden` if the permission is absent.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.permissions.contains(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Missing permission: {permission}"
            )))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn current_user(permissions: PermissionSet) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("staff@example.com").unwrap(),
            name: "Staff".to_owned(),
            role_id: Some(RoleId::new(3)),
            role_name: Some("staff".to_owned()),
            is_active: true,
            permissions,
        }
    }

    #[test]
    fn test_require_granted() {
        let user = current_user([Permission::ManageOrders].into_iter().collect());
        assert!(user.require(Permission::ManageOrders).is_ok());
    }

    #[test]
    fn test_require_missing_is_forbidden() {
        let user = current_user(PermissionSet::empty());
        let err = user.require(Permission::ManageUsers).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
