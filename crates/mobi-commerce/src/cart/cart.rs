//! Cart and line item types.

use crate::cart::CartPricing;
use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// A shopping cart.
///
/// Holds at most one line per product id. Serializes as a bare array of
/// lines, which is the shape kept in persisted storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines, folding duplicate product ids.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add_item(item.product, item.quantity);
        }
        cart
    }

    /// Add a product to the cart.
    ///
    /// An existing line for the same product grows by `quantity`; otherwise a
    /// new line is appended. The quantity is taken as given: no ceiling is
    /// applied and a non-positive value does not remove the line.
    pub fn add_item(&mut self, product: Product, quantity: i64) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartItem { product, quantity });
    }

    /// Set a line's quantity directly.
    ///
    /// Returns false if the product is not in the cart. A quantity of zero or
    /// less is stored as-is; routing it to a removal is the caller's job.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: i64) -> bool {
        match self.items.iter_mut().find(|i| &i.product.id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove_item(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| &i.product.id != product_id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Get a line by product id.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product.id == product_id)
    }

    /// Whether the product has a line in the cart.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct products.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Currency the cart is priced in.
    pub fn currency(&self) -> Currency {
        self.items
            .first()
            .map(|i| i.product.price.currency)
            .unwrap_or_default()
    }

    /// Compute the pricing summary.
    pub fn pricing(&self) -> CartPricing {
        let currency = self.currency();
        let mut subtotal = 0_i64;
        let mut savings = 0_i64;

        for item in &self.items {
            subtotal = subtotal.saturating_add(item.line_total().amount_minor);
            savings = savings.saturating_add(item.line_savings().amount_minor);
        }

        CartPricing {
            item_count: self.item_count(),
            subtotal: Money::new(subtotal, currency),
            savings: Money::new(savings, currency),
        }
    }

    /// Check the cart can be turned into an order.
    ///
    /// Unlike the mutators above, this rejects non-positive quantities and
    /// lines that exceed available stock.
    pub fn validate_for_checkout(&self) -> Result<(), CommerceError> {
        if self.items.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let currency = self.currency();
        for item in &self.items {
            if item.quantity <= 0 {
                return Err(CommerceError::InvalidQuantity(item.quantity));
            }
            if item.product.price.currency != currency {
                return Err(CommerceError::CurrencyMismatch {
                    expected: currency.code().to_string(),
                    got: item.product.price.currency.code().to_string(),
                });
            }
            if !item.product.in_stock() {
                return Err(CommerceError::OutOfStock(item.product.id.to_string()));
            }
            if item.quantity > item.product.stock_count {
                return Err(CommerceError::InsufficientInventory {
                    product_id: item.product.id.to_string(),
                    requested: item.quantity,
                    available: item.product.stock_count,
                });
            }
        }
        Ok(())
    }
}

/// A product snapshot and the quantity wanted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product at the time it was added.
    pub product: Product,
    /// Quantity.
    pub quantity: i64,
}

impl CartItem {
    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.product.price.saturating_multiply(self.quantity)
    }

    /// Savings against the original price for this line.
    pub fn line_savings(&self) -> Money {
        match self.product.original_price {
            Some(original) if original.amount_minor > self.product.price.amount_minor => {
                let per_unit = original.amount_minor - self.product.price.amount_minor;
                Money::new(per_unit, self.product.price.currency).saturating_multiply(self.quantity)
            }
            _ => Money::zero(self.product.price.currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone(id: &str, fils: i64) -> Product {
        Product::new(format!("Phone {}", id), "Acme", "smartphones", Money::kwd(fils))
            .with_id(id)
            .with_stock(10)
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 100_000), 2);

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.unique_item_count(), 1);
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 100_000), 1);
        cart.add_item(phone("p1", 100_000), 2);

        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 3);
    }

    #[test]
    fn test_add_non_positive_quantity_keeps_line() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 100_000), 1);
        cart.add_item(phone("p1", 100_000), -5);

        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, -4);
    }

    #[test]
    fn test_set_quantity_does_not_remove() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 100_000), 1);

        assert!(cart.set_quantity(&ProductId::new("p1"), 0));
        assert_eq!(cart.unique_item_count(), 1);
        assert!(!cart.set_quantity(&ProductId::new("missing"), 4));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 100_000), 1);

        assert!(cart.remove_item(&ProductId::new("p1")));
        assert!(cart.is_empty());
        assert!(!cart.remove_item(&ProductId::new("p1")));
    }

    #[test]
    fn test_pricing() {
        let mut cart = Cart::new();
        cart.add_item(
            phone("p1", 100_000).with_original_price(Money::kwd(120_000)),
            2,
        );
        cart.add_item(phone("p2", 50_500), 1);

        let pricing = cart.pricing();
        assert_eq!(pricing.item_count, 3);
        assert_eq!(pricing.subtotal, Money::kwd(250_500));
        assert_eq!(pricing.savings, Money::kwd(40_000));
    }

    #[test]
    fn test_from_items_folds_duplicates() {
        let items = vec![
            CartItem { product: phone("p1", 1_000), quantity: 1 },
            CartItem { product: phone("p1", 1_000), quantity: 4 },
        ];
        let cart = Cart::from_items(items);
        assert_eq!(cart.unique_item_count(), 1);
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_serializes_as_array() {
        let mut cart = Cart::new();
        cart.add_item(phone("p1", 1_000), 3);

        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains(r#""quantity":3"#));
    }

    #[test]
    fn test_validate_for_checkout() {
        let mut cart = Cart::new();
        assert_eq!(cart.validate_for_checkout(), Err(CommerceError::EmptyCart));

        cart.add_item(phone("p1", 1_000), 11);
        assert!(matches!(
            cart.validate_for_checkout(),
            Err(CommerceError::InsufficientInventory { requested: 11, available: 10, .. })
        ));

        cart.set_quantity(&ProductId::new("p1"), 0);
        assert_eq!(
            cart.validate_for_checkout(),
            Err(CommerceError::InvalidQuantity(0))
        );

        cart.set_quantity(&ProductId::new("p1"), 2);
        assert!(cart.validate_for_checkout().is_ok());
    }
}
