//! Signed-in user profiles.

use crate::error::AuthError;
use crate::permission::{Permission, PermissionCheck};
use crate::role::Role;
use mobi_commerce::ids::UserId;
use serde::{Deserialize, Deserializer, Serialize};

/// A user profile as stored in the `profiles` table.
///
/// `role` is `None` when the stored string is not a known role. Such a user
/// is denied everything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    /// User ID (same as the auth provider's user id).
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Role.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

impl AuthUser {
    pub fn new(id: UserId, email: impl Into<String>, role: Role) -> Self {
        let now = mobi_commerce::current_timestamp();
        Self {
            id,
            email: email.into(),
            full_name: None,
            phone: None,
            role: Some(role),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Name to show in the UI.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.email)
    }

    /// Whether the user may enter the back-office.
    pub fn is_staff(&self) -> bool {
        self.role.map(|r| r.is_staff()).unwrap_or(false)
    }

    /// Check a typed permission.
    pub fn can(&self, permission: Permission) -> bool {
        self.role.map(|r| r.allows(permission)).unwrap_or(false)
    }

    /// Check a permission string.
    pub fn can_str(&self, permission: &str) -> bool {
        self.role.map(|r| r.allows_str(permission)).unwrap_or(false)
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Guard for service calls: `Ok` when `user` holds `permission`.
pub fn require(user: Option<&AuthUser>, permission: Permission) -> Result<(), AuthError> {
    let user = user.ok_or(AuthError::NotAuthenticated)?;
    let check = PermissionCheck::from(permission);
    match user.role {
        Some(role) if role.allows_check(&check) => Ok(()),
        role => {
            tracing::debug!(
                user = %user.id,
                role = role.map(|r| r.as_str()).unwrap_or("unknown"),
                permission = %permission,
                "permission denied"
            );
            Err(AuthError::InsufficientPermissions {
                role: role.map(|r| r.as_str()).unwrap_or("unknown").to_string(),
                permission: permission.to_string(),
            })
        }
    }
}
