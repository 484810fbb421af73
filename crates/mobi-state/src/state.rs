//! Storefront state.

use mobi_commerce::cart::Cart;
use mobi_commerce::catalog::Category;
use mobi_commerce::compare::CompareSet;
use mobi_commerce::search::SearchState;
use mobi_commerce::wishlist::Wishlist;
use serde::{Deserialize, Serialize};

/// Client-side storefront state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    pub cart: Cart,
    pub wishlist: Wishlist,
    pub compare_products: CompareSet,
    pub search: SearchState,
    pub categories: Vec<Category>,
    pub loading: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Units in the cart, for the header badge.
    pub fn cart_badge(&self) -> i64 {
        self.cart.item_count()
    }

    /// Category by slug.
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }
}
