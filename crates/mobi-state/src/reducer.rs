//! The storefront reducer.

use crate::action::Action;
use crate::state::AppState;
use mobi_commerce::cart::Cart;
use mobi_commerce::wishlist::Wishlist;

/// Compute the next state. Pure: the input state is not touched.
pub fn reduce(state: &AppState, action: Action) -> AppState {
    let mut next = state.clone();
    apply(&mut next, action);
    next
}

pub(crate) fn apply(state: &mut AppState, action: Action) {
    match action {
        Action::AddToCart { product, quantity } => {
            state.cart.add_item(product, quantity);
        }
        Action::RemoveFromCart(id) => {
            state.cart.remove_item(&id);
        }
        Action::UpdateCartQuantity {
            product_id,
            quantity,
        } => {
            state.cart.set_quantity(&product_id, quantity);
        }
        Action::ClearCart => state.cart.clear(),

        Action::AddToWishlist(id) => {
            state.wishlist.add(id);
        }
        Action::RemoveFromWishlist(id) => {
            state.wishlist.remove(&id);
        }

        Action::AddToCompare(product) => {
            state.compare_products.add(product);
        }
        Action::RemoveFromCompare(id) => {
            state.compare_products.remove(&id);
        }
        Action::ClearCompare => state.compare_products.clear(),

        Action::SetSearchQuery(query) => state.search.set_query(query),
        Action::SetSearchFilters(patch) => state.search.apply_filters(patch),
        Action::SetSearchResults(page) => state.search.set_results(page),
        Action::SetSearchLoading(loading) => state.search.loading = loading,

        Action::SetCategories(categories) => state.categories = categories,
        Action::SetLoading(loading) => state.loading = loading,

        Action::HydrateCart(items) => state.cart = Cart::from_items(items),
        Action::HydrateWishlist(ids) => state.wishlist = Wishlist::from_ids(ids),
    }
}
