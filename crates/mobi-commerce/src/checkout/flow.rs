//! Turning a cart into an order.

use crate::cart::Cart;
use crate::checkout::{Address, Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
use crate::error::CommerceError;
use crate::ids::{OrderId, UserId};
use crate::money::{Currency, Money};
use crate::timestamp::current_timestamp;
use serde::{Deserialize, Serialize};

/// Delivery pricing. Amounts are in minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    /// Store currency.
    pub currency: Currency,
    /// Flat delivery fee.
    pub shipping_fee_minor: i64,
    /// Subtotal at or above which delivery is free.
    pub free_shipping_threshold_minor: Option<i64>,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency: Currency::KWD,
            shipping_fee_minor: 2_000,
            free_shipping_threshold_minor: Some(50_000),
        }
    }
}

impl CheckoutConfig {
    /// Delivery fee for a given subtotal.
    pub fn shipping_for(&self, subtotal: &Money) -> Money {
        match self.free_shipping_threshold_minor {
            Some(threshold) if subtotal.amount_minor >= threshold => Money::zero(self.currency),
            _ => Money::new(self.shipping_fee_minor, self.currency),
        }
    }
}

/// What the customer submits at checkout besides the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Signed-in customer, if any.
    #[serde(default)]
    pub customer_id: Option<UserId>,
    /// Contact email.
    pub email: String,
    /// Delivery address.
    pub shipping_address: Address,
    /// Billing address, if different.
    #[serde(default)]
    pub billing_address: Option<Address>,
    /// Payment method.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Note for the store.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    pub fn new(email: impl Into<String>, shipping_address: Address) -> Self {
        Self {
            customer_id: None,
            email: email.into(),
            shipping_address,
            billing_address: None,
            payment_method: PaymentMethod::default(),
            notes: None,
        }
    }

    pub fn with_customer(mut self, customer_id: UserId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    /// Check contact and address details.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(CommerceError::CheckoutIncomplete("email".to_string()));
        }
        let missing = self.shipping_address.missing_fields();
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(format!(
                "shipping address ({})",
                missing.join(", ")
            )));
        }
        if let Some(ref billing) = self.billing_address {
            let missing = billing.missing_fields();
            if !missing.is_empty() {
                return Err(CommerceError::CheckoutIncomplete(format!(
                    "billing address ({})",
                    missing.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// Build a pending order from a cart.
///
/// Prices are snapshotted from the cart lines. The cart itself is not
/// modified; the caller clears it once the order is stored.
pub fn build_order(
    cart: &Cart,
    request: &CheckoutRequest,
    config: &CheckoutConfig,
) -> Result<Order, CommerceError> {
    cart.validate_for_checkout()?;
    request.validate()?;

    let currency = cart.currency();
    if currency != config.currency {
        return Err(CommerceError::CurrencyMismatch {
            expected: config.currency.code().to_string(),
            got: currency.code().to_string(),
        });
    }

    let items: Vec<OrderItem> = cart
        .items()
        .iter()
        .map(|item| {
            OrderItem::new(
                item.product.id.clone(),
                item.product.name.clone(),
                item.quantity,
                item.product.price,
            )
        })
        .collect();

    let line_totals = items
        .iter()
        .map(|item| {
            item.unit_price
                .try_multiply(item.quantity)
                .ok_or(CommerceError::Overflow)
        })
        .collect::<Result<Vec<_>, _>>()?;
    let subtotal = Money::try_sum(line_totals.iter(), currency).ok_or(CommerceError::Overflow)?;
    let shipping_cost = config.shipping_for(&subtotal);
    let discount = Money::zero(currency);
    let total = subtotal
        .try_add(&shipping_cost)
        .and_then(|t| t.try_subtract(&discount))
        .ok_or(CommerceError::Overflow)?;

    let now = current_timestamp();
    Ok(Order {
        id: OrderId::generate(),
        order_number: Order::generate_order_number(),
        customer_id: request.customer_id.clone(),
        email: request.email.trim().to_string(),
        status: OrderStatus::Pending,
        payment_status: PaymentStatus::Pending,
        payment_method: request.payment_method,
        items,
        subtotal,
        shipping_cost,
        discount,
        total,
        shipping_address: request.shipping_address.clone(),
        billing_address: request.billing_address.clone(),
        notes: request.notes.clone(),
        created_at: now,
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;

    fn address() -> Address {
        Address::new("Sara Ali", "+96550000000", "Salmiya", "10", "5", "12")
    }

    fn phone(fils: i64, stock: i64) -> Product {
        Product::new("Galaxy S24", "Samsung", "smartphones", Money::kwd(fils))
            .with_id("s24")
            .with_stock(stock)
    }

    #[test]
    fn test_build_order_with_shipping_fee() {
        let mut cart = Cart::new();
        cart.add_item(phone(10_000, 5), 2);
        let request = CheckoutRequest::new("sara@example.com", address());

        let order = build_order(&cart, &request, &CheckoutConfig::default()).unwrap();

        assert_eq!(order.subtotal, Money::kwd(20_000));
        assert_eq!(order.shipping_cost, Money::kwd(2_000));
        assert_eq!(order.total, Money::kwd(22_000));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.item_count(), 2);
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[test]
    fn test_free_shipping_threshold() {
        let mut cart = Cart::new();
        cart.add_item(phone(299_000, 5), 1);
        let request = CheckoutRequest::new("sara@example.com", address());

        let order = build_order(&cart, &request, &CheckoutConfig::default()).unwrap();
        assert!(order.shipping_cost.is_zero());
        assert_eq!(order.total, Money::kwd(299_000));
    }

    #[test]
    fn test_rejects_empty_cart() {
        let request = CheckoutRequest::new("sara@example.com", address());
        let result = build_order(&Cart::new(), &request, &CheckoutConfig::default());
        assert_eq!(result, Err(CommerceError::EmptyCart));
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        cart.add_item(phone(10_000, 5), 1);
        cart.set_quantity(&"s24".into(), 0);
        let request = CheckoutRequest::new("sara@example.com", address());

        let result = build_order(&cart, &request, &CheckoutConfig::default());
        assert_eq!(result, Err(CommerceError::InvalidQuantity(0)));
    }

    #[test]
    fn test_rejects_incomplete_address() {
        let mut cart = Cart::new();
        cart.add_item(phone(10_000, 5), 1);
        let mut addr = address();
        addr.block.clear();
        let request = CheckoutRequest::new("sara@example.com", addr);

        let result = build_order(&cart, &request, &CheckoutConfig::default());
        assert!(matches!(
            result,
            Err(CommerceError::CheckoutIncomplete(msg)) if msg.contains("block")
        ));
    }

    #[test]
    fn test_rejects_bad_email() {
        let mut cart = Cart::new();
        cart.add_item(phone(10_000, 5), 1);
        let request = CheckoutRequest::new("not-an-email", address());

        let result = build_order(&cart, &request, &CheckoutConfig::default());
        assert_eq!(result, Err(CommerceError::CheckoutIncomplete("email".to_string())));
    }

    #[test]
    fn test_rejects_out_of_stock() {
        let mut cart = Cart::new();
        cart.add_item(phone(10_000, 0), 1);
        let request = CheckoutRequest::new("sara@example.com", address());

        let result = build_order(&cart, &request, &CheckoutConfig::default());
        assert_eq!(result, Err(CommerceError::OutOfStock("s24".to_string())));
    }
}
