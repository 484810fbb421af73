//! Backend connection settings.

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`BackendConfig::url`].
pub const ENV_BACKEND_URL: &str = "MOBI_BACKEND_URL";
/// Environment variable overriding [`BackendConfig::anon_key`].
pub const ENV_ANON_KEY: &str = "MOBI_ANON_KEY";

/// Where the hosted backend lives and how to identify to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) API key.
    pub anon_key: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".to_string(),
            anon_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            ..Self::default()
        }
    }

    /// Apply `MOBI_BACKEND_URL` / `MOBI_ANON_KEY` when set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.is_empty()) {
            self.url = url;
        }
        if let Some(key) = lookup(ENV_ANON_KEY).filter(|v| !v.is_empty()) {
            self.anon_key = key;
        }
        self
    }

    /// REST endpoint for a table or rpc path.
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url() {
        let config = BackendConfig::new("https://abc.supabase.co/", "key");
        assert_eq!(
            config.rest_url("products"),
            "https://abc.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn test_overrides() {
        let config = BackendConfig::default().with_overrides_from(|key| match key {
            ENV_BACKEND_URL => Some("https://prod.example".to_string()),
            ENV_ANON_KEY => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.url, "https://prod.example");
        assert_eq!(config.anon_key, "");
    }
}
