//! Callback-to-redirect decision.

use crate::callback::KnetCallback;
use crate::config::KnetConfig;
use crate::error::PaymentError;
use crate::verifier::PaymentVerifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOutcome {
    Success,
    Failure,
}

/// Where to send the shopper, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub outcome: PaymentOutcome,
    pub route: String,
    pub delay: Duration,
    pub query: Vec<(String, String)>,
}

impl Redirect {
    pub fn is_success(&self) -> bool {
        self.outcome == PaymentOutcome::Success
    }

    /// Route with its query string.
    pub fn location(&self) -> String {
        if self.query.is_empty() {
            return self.route.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("{}?{}", self.route, query.join("&"))
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Turns KNET redirects into success or failure redirects.
pub struct CallbackHandler<V: PaymentVerifier> {
    verifier: V,
    config: KnetConfig,
}

impl<V: PaymentVerifier> CallbackHandler<V> {
    pub fn new(verifier: V, config: KnetConfig) -> Self {
        Self { verifier, config }
    }

    pub fn config(&self) -> &KnetConfig {
        &self.config
    }

    /// Handle the raw query string of a return URL.
    pub async fn handle_query(&self, query: &str) -> Redirect {
        self.handle(&KnetCallback::parse(query)).await
    }

    /// Verify a parsed callback and pick the redirect.
    ///
    /// A callback without a payment id fails without calling the verifier.
    /// Verifier errors are logged and fail the payment.
    pub async fn handle(&self, callback: &KnetCallback) -> Redirect {
        let Some(payment_id) = callback.payment_id() else {
            tracing::warn!(
                trackid = callback.track_id.as_deref().unwrap_or(""),
                error = %PaymentError::MissingPaymentId,
                "rejecting payment callback"
            );
            return self.failure(callback, "missing_payment_id");
        };

        match self.verifier.verify(callback).await {
            Ok(verification) if verification.success => {
                tracing::info!(
                    payment_id,
                    order_id = verification.order_id.as_deref().unwrap_or(""),
                    "payment verified"
                );
                self.redirect(
                    PaymentOutcome::Success,
                    callback,
                    verification.order_id.as_deref(),
                    None,
                )
            }
            Ok(verification) => {
                tracing::info!(
                    payment_id,
                    result = callback.result.as_deref().unwrap_or(""),
                    message = verification.message.as_deref().unwrap_or(""),
                    "payment declined"
                );
                self.redirect(
                    PaymentOutcome::Failure,
                    callback,
                    verification.order_id.as_deref(),
                    Some("declined"),
                )
            }
            Err(e) => {
                tracing::warn!(payment_id, error = %e, "payment verification failed");
                self.failure(callback, "verification_error")
            }
        }
    }

    fn failure(&self, callback: &KnetCallback, reason: &str) -> Redirect {
        self.redirect(PaymentOutcome::Failure, callback, None, Some(reason))
    }

    fn redirect(
        &self,
        outcome: PaymentOutcome,
        callback: &KnetCallback,
        order_id: Option<&str>,
        reason: Option<&str>,
    ) -> Redirect {
        let route = match outcome {
            PaymentOutcome::Success => &self.config.success_route,
            PaymentOutcome::Failure => &self.config.failure_route,
        };

        let mut query = Vec::new();
        if let Some(track_id) = callback.track_id.as_deref() {
            query.push(("trackid".to_string(), track_id.to_string()));
        }
        if let Some(order_id) = order_id {
            query.push(("order".to_string(), order_id.to_string()));
        }
        if let Some(reason) = reason {
            query.push(("reason".to_string(), reason.to_string()));
        }

        Redirect {
            outcome,
            route: route.clone(),
            delay: self.config.redirect_delay(),
            query,
        }
    }
}
