//! State owner with cart and wishlist persistence.

use crate::action::Action;
use crate::reducer::apply;
use crate::state::AppState;
use mobi_cache::{KvStore, StorageConfig};
use mobi_commerce::cart::CartItem;
use mobi_commerce::ids::ProductId;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Owns an [`AppState`] and the store it is persisted to.
///
/// The cart and the wishlist are written back whenever an action changes
/// them. Storage problems never reach the caller: they are logged and the
/// in-memory state carries on.
pub struct Store<K: KvStore> {
    state: AppState,
    kv: K,
    cart_key: String,
    wishlist_key: String,
}

impl<K: KvStore> Store<K> {
    /// Load persisted state with the default key names.
    pub fn load(kv: K) -> Self {
        Self::load_with(kv, &StorageConfig::default())
    }

    /// Load persisted state using the key names from `config`.
    pub fn load_with(kv: K, config: &StorageConfig) -> Self {
        let mut store = Self {
            state: AppState::default(),
            kv,
            cart_key: config.cart_key.clone(),
            wishlist_key: config.wishlist_key.clone(),
        };

        if let Some(items) = store.read::<Vec<CartItem>>(&store.cart_key) {
            apply(&mut store.state, Action::HydrateCart(items));
        }
        if let Some(ids) = store.read::<Vec<ProductId>>(&store.wishlist_key) {
            apply(&mut store.state, Action::HydrateWishlist(ids));
        }

        tracing::debug!(
            cart_lines = store.state.cart.unique_item_count(),
            wishlist = store.state.wishlist.len(),
            "store loaded"
        );
        store
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Underlying key-value store.
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Apply an action and persist what it changed.
    pub fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = action.name(), "dispatch");

        let cart_before = self.state.cart.clone();
        let wishlist_before = self.state.wishlist.clone();
        apply(&mut self.state, action);

        if self.state.cart != cart_before {
            self.write(&self.cart_key, &self.state.cart);
        }
        if self.state.wishlist != wishlist_before {
            self.write(&self.wishlist_key, &self.state.wishlist);
        }
    }

    /// Read a persisted value. Unreadable values are removed.
    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.kv.get::<T>(key) {
            Ok(value) => value,
            Err(e) if e.is_malformed() => {
                tracing::warn!(key, error = %e, "discarding malformed stored value");
                if let Err(e) = self.kv.delete(key) {
                    tracing::warn!(key, error = %e, "failed to remove malformed value");
                }
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.kv.set(key, value) {
            tracing::warn!(key, error = %e, "failed to persist state");
        }
    }
}
