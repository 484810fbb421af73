//! Permissions and grants.
//!
//! A permission names a [`Resource`] and a [`PermAction`]. Its string form is
//! `"<resource>.<action>"`, e.g. `"orders.update"`. A role holds grants:
//! everything (`*`), a whole resource (`products.*`), or one exact permission.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Things a permission can be about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Products,
    Orders,
    Users,
    Categories,
    Analytics,
    Reviews,
    Settings,
    Changelog,
}

impl Resource {
    pub const ALL: [Resource; 8] = [
        Resource::Products,
        Resource::Orders,
        Resource::Users,
        Resource::Categories,
        Resource::Analytics,
        Resource::Reviews,
        Resource::Settings,
        Resource::Changelog,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Products => "products",
            Resource::Orders => "orders",
            Resource::Users => "users",
            Resource::Categories => "categories",
            Resource::Analytics => "analytics",
            Resource::Reviews => "reviews",
            Resource::Settings => "settings",
            Resource::Changelog => "changelog",
        }
    }
}

impl FromStr for Resource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is done to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermAction {
    Read,
    Create,
    Update,
    Delete,
}

impl PermAction {
    pub const ALL: [PermAction; 4] = [
        PermAction::Read,
        PermAction::Create,
        PermAction::Update,
        PermAction::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PermAction::Read => "read",
            PermAction::Create => "create",
            PermAction::Update => "update",
            PermAction::Delete => "delete",
        }
    }
}

impl FromStr for PermAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermAction::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or(())
    }
}

/// A single `(resource, action)` permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    pub resource: Resource,
    pub action: PermAction,
}

impl Permission {
    pub const fn new(resource: Resource, action: PermAction) -> Self {
        Self { resource, action }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource.as_str(), self.action.as_str())
    }
}

/// Something a role is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grant {
    /// `*`: every permission.
    All,
    /// `<resource>.*`: every action on one resource.
    Resource(Resource),
    /// One exact permission.
    Exact(Permission),
}

impl Grant {
    /// Check whether this grant satisfies a parsed check.
    pub fn covers(&self, check: &PermissionCheck) -> bool {
        match (self, check) {
            (Grant::All, _) => true,
            (Grant::Resource(granted), PermissionCheck::Exact(p)) => *granted == p.resource,
            (Grant::Resource(granted), PermissionCheck::ResourceWide(r)) => granted == r,
            (Grant::Exact(granted), PermissionCheck::Exact(p)) => granted == p,
            _ => false,
        }
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grant::All => f.write_str("*"),
            Grant::Resource(r) => write!(f, "{}.*", r.as_str()),
            Grant::Exact(p) => write!(f, "{}", p),
        }
    }
}

/// A requested permission string, parsed.
///
/// The resource is the text before the first `.`, or the whole string when
/// there is none. A known resource with a known action is `Exact`. A known
/// resource with anything else after it (`*`, an unknown action, nothing)
/// is `ResourceWide` and needs a `<resource>.*` grant. Anything naming an
/// unknown resource only passes a `*` grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionCheck {
    Exact(Permission),
    ResourceWide(Resource),
    Unrecognized(String),
}

impl PermissionCheck {
    pub fn parse(permission: &str) -> Self {
        let (resource, action) = match permission.split_once('.') {
            Some((resource, action)) => (resource, Some(action)),
            None => (permission, None),
        };

        let Ok(resource) = resource.parse::<Resource>() else {
            return PermissionCheck::Unrecognized(permission.to_string());
        };

        match action.map(str::parse::<PermAction>) {
            Some(Ok(action)) => PermissionCheck::Exact(Permission::new(resource, action)),
            _ => PermissionCheck::ResourceWide(resource),
        }
    }
}

impl From<Permission> for PermissionCheck {
    fn from(permission: Permission) -> Self {
        PermissionCheck::Exact(permission)
    }
}

/// Decide whether a role string is granted a permission string.
///
/// Unknown roles hold no grants, so they are always denied.
pub fn resolve(role: &str, permission: &str) -> bool {
    match role.parse::<Role>() {
        Ok(role) => role.allows_str(permission),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact() {
        assert_eq!(
            PermissionCheck::parse("orders.update"),
            PermissionCheck::Exact(Permission::new(Resource::Orders, PermAction::Update))
        );
    }

    #[test]
    fn test_parse_resource_wide() {
        assert_eq!(
            PermissionCheck::parse("products.*"),
            PermissionCheck::ResourceWide(Resource::Products)
        );
        assert_eq!(
            PermissionCheck::parse("products"),
            PermissionCheck::ResourceWide(Resource::Products)
        );
        assert_eq!(
            PermissionCheck::parse("products.archive"),
            PermissionCheck::ResourceWide(Resource::Products)
        );
    }

    #[test]
    fn test_parse_unrecognized() {
        assert!(matches!(
            PermissionCheck::parse("inventory.read"),
            PermissionCheck::Unrecognized(_)
        ));
        assert!(matches!(PermissionCheck::parse(""), PermissionCheck::Unrecognized(_)));
        assert!(matches!(
            PermissionCheck::parse("Products.read"),
            PermissionCheck::Unrecognized(_)
        ));
    }

    #[test]
    fn test_grant_display() {
        assert_eq!(Grant::All.to_string(), "*");
        assert_eq!(Grant::Resource(Resource::Orders).to_string(), "orders.*");
        assert_eq!(
            Grant::Exact(Permission::new(Resource::Settings, PermAction::Read)).to_string(),
            "settings.read"
        );
    }

    #[test]
    fn test_exact_grant_does_not_cover_wildcard_request() {
        let grant = Grant::Exact(Permission::new(Resource::Products, PermAction::Read));
        assert!(!grant.covers(&PermissionCheck::parse("products.*")));
        assert!(grant.covers(&PermissionCheck::parse("products.read")));
    }

    #[test]
    fn test_resolve_resource_wildcard() {
        assert!(resolve("manager", "products.read"));
        assert!(resolve("manager", "products.delete"));
        assert!(!resolve("manager", "settings.read"));
    }

    #[test]
    fn test_resolve_super_admin_allows_everything() {
        for resource in Resource::ALL {
            for action in PermAction::ALL {
                assert!(resolve("super_admin", &Permission::new(resource, action).to_string()));
            }
        }
        assert!(resolve("super_admin", "inventory.read"));
        assert!(resolve("super_admin", "*"));
    }

    #[test]
    fn test_resolve_unknown_role_denies() {
        assert!(!resolve("owner", "products.read"));
        assert!(!resolve("", "products.read"));
    }

    #[test]
    fn test_resolve_dotless_permission() {
        // "products" has resource "products", so a products.* grant covers it.
        assert!(resolve("manager", "products"));
        assert!(!resolve("editor", "products"));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for _ in 0..3 {
            assert!(resolve("editor", "products.update"));
            assert!(!resolve("editor", "products.delete"));
        }
    }
}
