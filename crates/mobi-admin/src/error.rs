//! Back-office error types.

use mobi_auth::AuthError;
use mobi_commerce::CommerceError;
use mobi_data::FetchError;
use thiserror::Error;

/// Errors returned by admin services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    /// The acting user may not do this.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Backend request failed.
    #[error("Backend error: {0}")]
    Fetch(#[from] FetchError),

    /// Domain validation failed.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Invalid input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bundled changelog could not be read.
    #[error("Changelog error: {0}")]
    Changelog(String),
}

impl AdminError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AdminError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Check if this is a permission error.
    pub fn is_permission_error(&self) -> bool {
        matches!(self, AdminError::Auth(e) if e.is_permission_error())
    }
}

impl From<serde_json::Error> for AdminError {
    fn from(e: serde_json::Error) -> Self {
        AdminError::Fetch(FetchError::from(e))
    }
}
