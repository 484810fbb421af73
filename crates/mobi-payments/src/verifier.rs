//! Server-side payment verification.

use crate::callback::KnetCallback;
use crate::error::PaymentError;
use async_trait::async_trait;
use mobi_data::Backend;
use serde::{Deserialize, Serialize};

/// Backend function that confirms a KNET payment.
pub const VERIFY_FUNCTION: &str = "verify-knet-payment";

/// What the verifier concluded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verification {
    pub success: bool,
    /// Order the payment belongs to, when known.
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Verification {
    pub fn success(order_id: impl Into<String>) -> Self {
        Self {
            success: true,
            order_id: Some(order_id.into()),
            message: None,
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            order_id: None,
            message: Some(message.into()),
        }
    }
}

/// Confirms a callback with a trusted party.
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    async fn verify(&self, callback: &KnetCallback) -> Result<Verification, PaymentError>;
}

/// Verifies through [`VERIFY_FUNCTION`] on the hosted backend.
pub struct RpcVerifier<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> RpcVerifier<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: Backend + ?Sized> PaymentVerifier for RpcVerifier<'_, B> {
    async fn verify(&self, callback: &KnetCallback) -> Result<Verification, PaymentError> {
        let response = self.backend.rpc(VERIFY_FUNCTION, callback.to_params()).await?;
        serde_json::from_value(response).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_data::{FetchError, MemoryBackend};
    use serde_json::json;

    #[tokio::test]
    async fn test_rpc_forwards_params() {
        let backend = MemoryBackend::new().with_function(VERIFY_FUNCTION, |args| {
            assert_eq!(args, json!({"paymentid": "42", "trackid": "ORD-1", "udf2": "x"}));
            Ok(json!({"success": true, "order_id": "o1"}))
        });
        let callback = KnetCallback::parse("paymentid=42&trackid=ORD-1&udf2=x");

        let verification = RpcVerifier::new(&backend).verify(&callback).await.unwrap();
        assert_eq!(verification, Verification::success("o1"));
    }

    #[tokio::test]
    async fn test_rpc_errors() {
        let backend = MemoryBackend::new()
            .with_function(VERIFY_FUNCTION, |_| Ok(json!("ok")));
        let callback = KnetCallback::parse("paymentid=42");
        let err = RpcVerifier::new(&backend).verify(&callback).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidResponse(_)));

        let backend = MemoryBackend::new();
        let err = RpcVerifier::new(&backend).verify(&callback).await.unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Verification(FetchError::UnknownFunction(_))
        ));
    }
}
