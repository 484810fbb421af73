//! Authorization for MobiStore.
//!
//! Every user carries exactly one [`Role`]. Each role owns a fixed list of
//! [`Grant`]s, and a permission check succeeds when any grant covers it.
//!
//! ```rust
//! use mobi_auth::{resolve, PermAction, Permission, Resource, Role};
//!
//! assert!(resolve("manager", "products.delete"));
//! assert!(!resolve("editor", "orders.read"));
//! assert!(Role::SuperAdmin.allows(Permission::new(Resource::Settings, PermAction::Delete)));
//! ```

mod error;
mod permission;
mod role;
mod user;

pub use error::AuthError;
pub use permission::{resolve, Grant, PermAction, Permission, PermissionCheck, Resource};
pub use role::Role;
pub use user::{require, AuthUser};
