//! Storefront actions.

use mobi_commerce::cart::CartItem;
use mobi_commerce::catalog::{Category, Product};
use mobi_commerce::ids::ProductId;
use mobi_commerce::search::{FilterPatch, SearchPage};

/// Everything that can change [`AppState`](crate::AppState).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Add `quantity` of a product, merging with an existing line.
    AddToCart { product: Product, quantity: i64 },
    RemoveFromCart(ProductId),
    /// Set a line's quantity as given. Zero or negative values are kept.
    UpdateCartQuantity { product_id: ProductId, quantity: i64 },
    ClearCart,

    AddToWishlist(ProductId),
    RemoveFromWishlist(ProductId),

    AddToCompare(Product),
    RemoveFromCompare(ProductId),
    ClearCompare,

    SetSearchQuery(String),
    SetSearchFilters(FilterPatch),
    SetSearchResults(SearchPage),
    SetSearchLoading(bool),

    SetCategories(Vec<Category>),
    SetLoading(bool),

    /// Replace the cart with persisted lines.
    HydrateCart(Vec<CartItem>),
    /// Replace the wishlist with persisted ids.
    HydrateWishlist(Vec<ProductId>),
}

impl Action {
    /// What the cart page sends when a quantity field changes: zero or
    /// less removes the line, anything else sets it.
    pub fn set_quantity_or_remove(product_id: ProductId, quantity: i64) -> Self {
        if quantity <= 0 {
            Action::RemoveFromCart(product_id)
        } else {
            Action::UpdateCartQuantity {
                product_id,
                quantity,
            }
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Action::AddToCart { .. } => "add_to_cart",
            Action::RemoveFromCart(_) => "remove_from_cart",
            Action::UpdateCartQuantity { .. } => "update_cart_quantity",
            Action::ClearCart => "clear_cart",
            Action::AddToWishlist(_) => "add_to_wishlist",
            Action::RemoveFromWishlist(_) => "remove_from_wishlist",
            Action::AddToCompare(_) => "add_to_compare",
            Action::RemoveFromCompare(_) => "remove_from_compare",
            Action::ClearCompare => "clear_compare",
            Action::SetSearchQuery(_) => "set_search_query",
            Action::SetSearchFilters(_) => "set_search_filters",
            Action::SetSearchResults(_) => "set_search_results",
            Action::SetSearchLoading(_) => "set_search_loading",
            Action::SetCategories(_) => "set_categories",
            Action::SetLoading(_) => "set_loading",
            Action::HydrateCart(_) => "hydrate_cart",
            Action::HydrateWishlist(_) => "hydrate_wishlist",
        }
    }
}
