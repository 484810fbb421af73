//! `mobistore.toml`.

use std::path::Path;

use anyhow::{Context, Result};
use mobi_admin::AdminConfig;
use mobi_cache::StorageConfig;
use mobi_commerce::checkout::CheckoutConfig;
use mobi_data::BackendConfig;
use mobi_payments::KnetConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, nearest directory first.
pub const CONFIG_NAMES: [&str; 2] = ["mobistore.toml", ".mobistore.toml"];

/// Every section of the store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MobiConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub checkout: CheckoutConfig,
    pub knet: KnetConfig,
    pub admin: AdminConfig,
}

impl MobiConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `MOBI_BACKEND_URL` / `MOBI_ANON_KEY`.
    pub fn with_env_overrides(mut self) -> Self {
        self.backend = self.backend.with_env_overrides();
        self
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Commented starter config.
pub fn generate_default_config() -> String {
    r#"# MobiStore configuration

[backend]
url = "http://localhost:54321"
# Overridden by MOBI_ANON_KEY when set.
anon_key = ""
timeout_secs = 30

[storage]
directory = ".mobistore"
cart_key = "cart"
wishlist_key = "wishlist"

[checkout]
currency = "KWD"
# 2.000 KD delivery, free from 50.000 KD (amounts in fils).
shipping_fee_minor = 2000
free_shipping_threshold_minor = 50000

[knet]
success_route = "/checkout/success"
failure_route = "/checkout/failure"
redirect_delay_secs = 3

[admin]
low_stock_threshold = 5
top_products_limit = 5
"#
    .to_string()
}
