//! Payment redirect settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the shopper goes after a KNET callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnetConfig {
    /// Route shown after a verified payment.
    pub success_route: String,
    /// Route shown after a declined or unverifiable payment.
    pub failure_route: String,
    /// Seconds the result page waits before redirecting.
    pub redirect_delay_secs: u64,
}

impl Default for KnetConfig {
    fn default() -> Self {
        Self {
            success_route: "/checkout/success".to_string(),
            failure_route: "/checkout/failure".to_string(),
            redirect_delay_secs: 3,
        }
    }
}

impl KnetConfig {
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_secs(self.redirect_delay_secs)
    }

    pub fn with_redirect_delay(mut self, secs: u64) -> Self {
        self.redirect_delay_secs = secs;
        self
    }
}
