//! Authorization errors.

use thiserror::Error;

/// Authorization error type.
///
/// The resolver itself answers with a plain `bool`; these errors come from
/// guards that turn a denial into something a service can return.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// No signed-in user.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The user's role does not grant the permission.
    #[error("role {role} lacks permission {permission}")]
    InsufficientPermissions { role: String, permission: String },

    /// Role string that is not one of the fixed roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl AuthError {
    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AuthError::InsufficientPermissions { .. })
    }
}
