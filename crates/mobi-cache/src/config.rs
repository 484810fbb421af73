//! Storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where client state is kept and under which keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for [`FileStore`](crate::FileStore).
    pub directory: PathBuf,
    /// Key holding the serialized cart.
    pub cart_key: String,
    /// Key holding the serialized wishlist.
    pub wishlist_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(".mobistore"),
            cart_key: "cart".to_string(),
            wishlist_key: "wishlist".to_string(),
        }
    }
}

impl StorageConfig {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.cart_key, "cart");
        assert_eq!(config.wishlist_key, "wishlist");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: StorageConfig = serde_json::from_str(r#"{"directory":"/tmp/x"}"#).unwrap();
        assert_eq!(config.directory, PathBuf::from("/tmp/x"));
        assert_eq!(config.cart_key, "cart");
    }
}
