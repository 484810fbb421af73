//! Category types for product organization.

use crate::ids::CategoryId;
use crate::timestamp::current_timestamp;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Parent category ID (None for root categories).
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// URL-friendly slug.
    pub slug: String,
    /// Category description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Sort order position.
    #[serde(default)]
    pub sort_order: i32,
    /// Whether the category is shown in the storefront.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
}

fn default_active() -> bool {
    true
}

impl Category {
    /// Create a new root category.
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate(),
            parent_id: None,
            name: name.into(),
            slug: slug.into(),
            description: None,
            image_url: None,
            sort_order: 0,
            is_active: true,
            created_at: current_timestamp(),
        }
    }

    /// Create a new child category.
    pub fn new_child(parent: &Category, name: impl Into<String>, slug: impl Into<String>) -> Self {
        let mut category = Self::new(name, slug);
        category.parent_id = Some(parent.id.clone());
        category
    }

    /// Check if this is a root category.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Derive a slug from a display name ("Smart Watches" -> "smart-watches").
    pub fn slugify(name: &str) -> String {
        let mut slug = String::with_capacity(name.len());
        let mut last_dash = true;
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
                last_dash = false;
            } else if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug
    }
}

/// Sort categories for display: by sort order, then name.
pub fn sort_for_display(categories: &mut [Category]) {
    categories.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}
