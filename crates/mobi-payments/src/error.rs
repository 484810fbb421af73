//! Payment error types.

use mobi_data::FetchError;
use thiserror::Error;

/// Errors that can occur while handling a gateway callback.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    /// The redirect carried no payment id.
    #[error("Payment callback is missing paymentid")]
    MissingPaymentId,

    /// The verification call failed.
    #[error("Verification failed: {0}")]
    Verification(#[from] FetchError),

    /// The verifier answered with something unreadable.
    #[error("Invalid verification response: {0}")]
    InvalidResponse(String),
}
