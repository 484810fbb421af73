//! Product catalog module.
//!
//! Contains types for products, specifications, and categories.

mod category;
mod product;

pub use category::{sort_for_display, Category};
pub use product::{Product, Specification};
