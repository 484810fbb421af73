//! Backend client error types.

use thiserror::Error;

/// Errors that can occur when talking to the hosted backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timeout.
    #[error("Request timed out")]
    Timeout,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// A single row was expected and none matched.
    #[error("No row in {table} matched")]
    NotFound { table: String },

    /// Function not exposed by the backend.
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Missing or invalid backend configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FetchError {
    /// Check if the backend answered with the given status.
    pub fn is_status(&self, code: u16) -> bool {
        matches!(self, FetchError::Http { status, .. } if *status == code)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::ParseError(e.to_string())
        } else if let Some(status) = e.status() {
            FetchError::Http {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            FetchError::RequestError(e.to_string())
        }
    }
}
