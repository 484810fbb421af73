//! Shopping cart module.
//!
//! Contains the cart, its line items, and the pricing summary.

#[allow(clippy::module_inception)]
mod cart;
mod pricing;

pub use cart::{Cart, CartItem};
pub use pricing::CartPricing;
