//! Storefront domain types and logic for MobiStore.
//!
//! This crate holds the types the storefront and the back-office share:
//!
//! - **Catalog**: Products, specifications, categories
//! - **Cart**: Line items keyed by product, pricing summary
//! - **Wishlist / Compare**: Product-id set and the four-slot compare tray
//! - **Search**: Filters, search state, pagination
//! - **Checkout**: Addresses, orders, order and payment status
//!
//! # Example
//!
//! ```rust
//! use mobi_commerce::prelude::*;
//!
//! let phone = Product::new("iPhone 15", "Apple", "smartphones", Money::kwd(299_000));
//!
//! let mut cart = Cart::new();
//! cart.add_item(phone.clone(), 1);
//! cart.add_item(phone, 2);
//!
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.pricing().subtotal.display(), "KD 897.000");
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod compare;
pub mod search;
pub mod wishlist;

mod timestamp;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};
pub use timestamp::current_timestamp;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{Category, Product, Specification};

    // Cart, wishlist, compare
    pub use crate::cart::{Cart, CartItem, CartPricing};
    pub use crate::compare::{CompareSet, MAX_COMPARE_PRODUCTS};
    pub use crate::wishlist::Wishlist;

    // Checkout
    pub use crate::checkout::{
        Address, CheckoutConfig, CheckoutRequest, Order, OrderItem, OrderStatus, PaymentMethod,
        PaymentStatus,
    };

    // Search
    pub use crate::search::{
        FilterPatch, Pagination, PriceRange, SearchFilters, SearchPage, SearchState, SortOption,
    };
}
