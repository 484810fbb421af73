//! Checkout module.
//!
//! Contains addresses, orders, and the cart-to-order step.

mod address;
mod flow;
mod order;

pub use address::Address;
pub use flow::{build_order, CheckoutConfig, CheckoutRequest};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
