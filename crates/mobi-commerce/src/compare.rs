//! Product comparison tray.

use crate::catalog::Product;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Maximum number of products shown side by side.
pub const MAX_COMPARE_PRODUCTS: usize = 4;

/// Up to four distinct product snapshots, in the order they were added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct CompareSet {
    products: Vec<Product>,
}

impl CompareSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product. No-op (returns false) when full or already present.
    pub fn add(&mut self, product: Product) -> bool {
        if self.is_full() || self.contains(&product.id) {
            return false;
        }
        self.products.push(product);
        true
    }

    /// Remove a product. Returns whether it was present.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let len_before = self.products.len();
        self.products.retain(|p| &p.id != id);
        self.products.len() < len_before
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.products.len() >= MAX_COMPARE_PRODUCTS
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Union of specification names across the tray, in first-seen order.
    ///
    /// These are the rows of the comparison table.
    pub fn specification_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for product in &self.products {
            for spec in &product.specifications {
                if !names.iter().any(|n| n.eq_ignore_ascii_case(&spec.name)) {
                    names.push(&spec.name);
                }
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Specification;
    use crate::money::Money;

    fn product(id: &str) -> Product {
        Product::new(id, "Acme", "smartphones", Money::kwd(1_000)).with_id(id)
    }

    #[test]
    fn test_never_exceeds_four() {
        let mut set = CompareSet::new();
        for i in 0..10 {
            set.add(product(&format!("p{}", i)));
        }
        assert_eq!(set.len(), MAX_COMPARE_PRODUCTS);
        assert!(set.is_full());
    }

    #[test]
    fn test_duplicate_is_noop() {
        let mut set = CompareSet::new();
        assert!(set.add(product("p1")));
        assert!(!set.add(product("p1")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_frees_slot() {
        let mut set = CompareSet::new();
        for i in 0..4 {
            set.add(product(&format!("p{}", i)));
        }
        assert!(set.remove(&ProductId::new("p2")));
        assert!(set.add(product("p9")));
        assert_eq!(set.products().last().unwrap().id.as_str(), "p9");
    }

    #[test]
    fn test_specification_names() {
        let mut a = product("a");
        a.specifications = vec![
            Specification::new("RAM", "8GB"),
            Specification::new("Storage", "128GB"),
        ];
        let mut b = product("b");
        b.specifications = vec![
            Specification::new("storage", "256GB"),
            Specification::new("Battery", "5000mAh"),
        ];

        let mut set = CompareSet::new();
        set.add(a);
        set.add(b);
        assert_eq!(set.specification_names(), vec!["RAM", "Storage", "Battery"]);
    }
}
