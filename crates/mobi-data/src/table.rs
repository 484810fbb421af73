//! Backend tables.

use std::fmt;

/// Tables exposed by the hosted backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Profiles,
    Categories,
    Products,
    ProductImages,
    Orders,
    OrderItems,
    CartItems,
    Reviews,
    WishlistItems,
    Addresses,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Categories => "categories",
            Table::Products => "products",
            Table::ProductImages => "product_images",
            Table::Orders => "orders",
            Table::OrderItems => "order_items",
            Table::CartItems => "cart_items",
            Table::Reviews => "reviews",
            Table::WishlistItems => "wishlist_items",
            Table::Addresses => "addresses",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
