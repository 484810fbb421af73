//! Back-office settings.

use serde::{Deserialize, Serialize};

/// Dashboard tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Active products at or below this stock count raise an alert.
    pub low_stock_threshold: i64,
    /// How many best sellers the dashboard lists.
    pub top_products_limit: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            top_products_limit: 5,
        }
    }
}
