//! Wishlist: an ordered set of product ids.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Saved-for-later product ids, in the order they were added.
///
/// Serializes as a bare array of id strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Wishlist {
    ids: Vec<ProductId>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from stored ids, dropping duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        let mut wishlist = Self::new();
        for id in ids {
            wishlist.add(id);
        }
        wishlist
    }

    /// Add an id. Returns false if it was already present.
    pub fn add(&mut self, id: ProductId) -> bool {
        if self.ids.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id. Returns whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.ids.len();
        self.ids.retain(|i| i != id);
        self.ids.len() < len_before
    }

    /// Add if absent, remove if present. Returns the new membership.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
