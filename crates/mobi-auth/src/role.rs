//! Roles and their grant tables.

use crate::error::AuthError;
use crate::permission::{Grant, PermAction, Permission, PermissionCheck, Resource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use PermAction::{Create, Read, Update};
use Resource::{Analytics, Categories, Changelog, Orders, Products, Reviews, Settings, Users};

const fn exact(resource: Resource, action: PermAction) -> Grant {
    Grant::Exact(Permission::new(resource, action))
}

const SUPER_ADMIN: &[Grant] = &[Grant::All];

const ADMIN: &[Grant] = &[
    Grant::Resource(Products),
    Grant::Resource(Orders),
    Grant::Resource(Users),
    Grant::Resource(Categories),
    Grant::Resource(Analytics),
    Grant::Resource(Reviews),
    Grant::Resource(Changelog),
    exact(Settings, Read),
];

const MANAGER: &[Grant] = &[
    Grant::Resource(Products),
    Grant::Resource(Orders),
    Grant::Resource(Categories),
    Grant::Resource(Reviews),
    exact(Analytics, Read),
    exact(Users, Read),
];

const EDITOR: &[Grant] = &[
    exact(Products, Read),
    exact(Products, Create),
    exact(Products, Update),
    exact(Categories, Read),
    exact(Categories, Create),
    exact(Categories, Update),
    exact(Reviews, Read),
    exact(Reviews, Update),
    exact(Changelog, Read),
];

const VIEWER: &[Grant] = &[
    exact(Products, Read),
    exact(Orders, Read),
    exact(Categories, Read),
    exact(Analytics, Read),
    exact(Users, Read),
    exact(Reviews, Read),
];

const CUSTOMER: &[Grant] = &[
    exact(Products, Read),
    exact(Categories, Read),
    exact(Reviews, Read),
    exact(Reviews, Create),
    exact(Orders, Create),
    exact(Orders, Read),
];

/// User role. Every user has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including other super admins.
    SuperAdmin,
    /// Store administrator.
    Admin,
    /// Runs day-to-day catalog and order work.
    Manager,
    /// Edits catalog content.
    Editor,
    /// Read-only back-office access.
    Viewer,
    /// Storefront shopper.
    #[default]
    Customer,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::SuperAdmin,
        Role::Admin,
        Role::Manager,
        Role::Editor,
        Role::Viewer,
        Role::Customer,
    ];

    /// Get role as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
            Role::Customer => "customer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "Super Admin",
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Editor => "Editor",
            Role::Viewer => "Viewer",
            Role::Customer => "Customer",
        }
    }

    /// The role's grant list.
    pub fn permissions(&self) -> &'static [Grant] {
        match self {
            Role::SuperAdmin => SUPER_ADMIN,
            Role::Admin => ADMIN,
            Role::Manager => MANAGER,
            Role::Editor => EDITOR,
            Role::Viewer => VIEWER,
            Role::Customer => CUSTOMER,
        }
    }

    /// Whether the role may enter the back-office.
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Customer)
    }

    /// Check a typed permission.
    pub fn allows(&self, permission: Permission) -> bool {
        self.allows_check(&PermissionCheck::Exact(permission))
    }

    /// Check a permission string such as `"orders.update"`.
    pub fn allows_str(&self, permission: &str) -> bool {
        self.allows_check(&PermissionCheck::parse(permission))
    }

    pub fn allows_check(&self, check: &PermissionCheck) -> bool {
        self.permissions().iter().any(|grant| grant.covers(check))
    }

    /// Whether a user with this role may give `target` to someone.
    ///
    /// Needs `users.update`; only a super admin may hand out super admin.
    pub fn can_assign(&self, target: Role) -> bool {
        self.allows(Permission::new(Users, Update))
            && (target != Role::SuperAdmin || *self == Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!(
            "Admin".parse::<Role>(),
            Err(AuthError::UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn test_super_admin_allows_every_permission() {
        for resource in Resource::ALL {
            for action in PermAction::ALL {
                assert!(Role::SuperAdmin.allows(Permission::new(resource, action)));
            }
        }
    }

    #[test]
    fn test_admin_settings_read_only() {
        assert!(Role::Admin.allows_str("settings.read"));
        assert!(!Role::Admin.allows_str("settings.update"));
        assert!(Role::Admin.allows_str("users.delete"));
    }

    #[test]
    fn test_manager_products_wildcard() {
        assert!(Role::Manager.allows(Permission::new(Products, Read)));
        assert!(Role::Manager.allows(Permission::new(Products, PermAction::Delete)));
        assert!(!Role::Manager.allows(Permission::new(Users, PermAction::Delete)));
    }

    #[test]
    fn test_editor_cannot_delete() {
        assert!(Role::Editor.allows_str("products.update"));
        assert!(!Role::Editor.allows_str("products.delete"));
        assert!(!Role::Editor.allows_str("orders.read"));
    }

    #[test]
    fn test_customer_is_not_staff() {
        assert!(!Role::Customer.is_staff());
        assert!(Role::Viewer.is_staff());
        assert!(Role::Customer.allows_str("orders.create"));
        assert!(!Role::Customer.allows_str("orders.update"));
    }

    #[test]
    fn test_role_assignment() {
        assert!(Role::SuperAdmin.can_assign(Role::SuperAdmin));
        assert!(Role::Admin.can_assign(Role::Manager));
        assert!(!Role::Admin.can_assign(Role::SuperAdmin));
        assert!(!Role::Manager.can_assign(Role::Viewer));
    }

    #[test]
    fn test_serde_snake_case() {
        let role: Role = serde_json::from_str(r#""super_admin""#).unwrap();
        assert_eq!(role, Role::SuperAdmin);
    }
}
