//! KNET payment callback handling for MobiStore.
//!
//! KNET sends the shopper back to the store with the payment result in the
//! query string. [`CallbackHandler`] parses it into a [`KnetCallback`],
//! forwards the parameters to a [`PaymentVerifier`] and answers with a
//! delayed [`Redirect`] to the success or failure page.

mod callback;
mod config;
mod error;
mod handler;
mod verifier;

pub use callback::KnetCallback;
pub use config::KnetConfig;
pub use error::PaymentError;
pub use handler::{CallbackHandler, PaymentOutcome, Redirect};
pub use verifier::{PaymentVerifier, RpcVerifier, Verification, VERIFY_FUNCTION};
