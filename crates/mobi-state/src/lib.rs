//! Storefront state container for MobiStore.
//!
//! All client-side storefront state (cart, wishlist, compare tray, search,
//! categories) lives in one [`AppState`]. It only changes through
//! [`reduce`], a pure function of the current state and an [`Action`].
//! [`Store`] owns the state, runs the reducer, and persists the cart and
//! the wishlist to a [`KvStore`](mobi_cache::KvStore).
//!
//! # Example
//!
//! ```rust
//! use mobi_cache::MemoryStore;
//! use mobi_commerce::prelude::*;
//! use mobi_state::{Action, Store};
//!
//! let mut store = Store::load(MemoryStore::new());
//! let phone = Product::new("Pixel 8", "Google", "smartphones", Money::kwd(189_000));
//!
//! store.dispatch(Action::AddToCart { product: phone.clone(), quantity: 1 });
//! store.dispatch(Action::AddToCart { product: phone, quantity: 2 });
//!
//! assert_eq!(store.state().cart.item_count(), 3);
//! ```

mod action;
mod reducer;
mod state;
mod store;

pub use action::Action;
pub use reducer::reduce;
pub use state::AppState;
pub use store::Store;
