//! Cart pricing calculations.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing summary for a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Sum of quantities.
    pub item_count: i64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Amount saved against original prices.
    pub savings: Money,
}

impl CartPricing {
    /// Check if any line is discounted.
    pub fn has_savings(&self) -> bool {
        self.savings.is_positive()
    }

    /// Savings as a percentage of the pre-discount subtotal.
    pub fn savings_percentage(&self) -> f64 {
        let before = self.subtotal.amount_minor.saturating_add(self.savings.amount_minor);
        if before <= 0 {
            return 0.0;
        }
        (self.savings.amount_minor as f64 / before as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings_percentage() {
        let pricing = CartPricing {
            item_count: 1,
            subtotal: Money::kwd(75_000),
            savings: Money::kwd(25_000),
        };
        assert!(pricing.has_savings());
        assert!((pricing.savings_percentage() - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_no_savings_on_empty() {
        let pricing = CartPricing {
            item_count: 0,
            subtotal: Money::kwd(0),
            savings: Money::kwd(0),
        };
        assert!(!pricing.has_savings());
        assert_eq!(pricing.savings_percentage(), 0.0);
    }
}
