//! Product types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use crate::timestamp::current_timestamp;
use serde::{Deserialize, Serialize};

/// A named technical specification (e.g., "Display": "6.1 inch OLED").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Specification {
    /// Specification name.
    pub name: String,
    /// Specification value.
    pub value: String,
}

impl Specification {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A phone or accessory in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Manufacturer brand (e.g., "Apple").
    pub brand: String,
    /// Category slug.
    pub category: String,
    /// Selling price. Never negative.
    pub price: Money,
    /// Price before discount, shown struck through.
    #[serde(default)]
    pub original_price: Option<Money>,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Image URLs, first one is the cover.
    #[serde(default)]
    pub images: Vec<String>,
    /// Technical specifications.
    #[serde(default)]
    pub specifications: Vec<Specification>,
    /// Marketing bullet points.
    #[serde(default)]
    pub features: Vec<String>,
    /// Tags for filtering/search.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Units on hand.
    #[serde(default)]
    pub stock_count: i64,
    /// Whether the product is listed.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Average review rating (0-5).
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: i64,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

fn default_active() -> bool {
    true
}

impl Product {
    /// Create a new active product with no stock.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id: ProductId::generate(),
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            original_price: None,
            description: String::new(),
            images: Vec::new(),
            specifications: Vec::new(),
            features: Vec::new(),
            tags: Vec::new(),
            stock_count: 0,
            is_active: true,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the stock count.
    pub fn with_stock(mut self, stock_count: i64) -> Self {
        self.stock_count = stock_count;
        self
    }

    /// Set the pre-discount price.
    pub fn with_original_price(mut self, original_price: Money) -> Self {
        self.original_price = Some(original_price);
        self
    }

    /// Whether the product can be bought right now.
    ///
    /// Derived from the active flag and stock count; there is no stored flag.
    pub fn in_stock(&self) -> bool {
        self.is_active && self.stock_count > 0
    }

    /// Check the catalog invariants.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.price.is_negative() {
            return Err(CommerceError::InvalidPrice(self.id.to_string()));
        }
        if let Some(original) = self.original_price {
            if original.is_negative() {
                return Err(CommerceError::InvalidPrice(self.id.to_string()));
            }
        }
        if self.name.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "product name is required".to_string(),
            ));
        }
        if self.stock_count < 0 {
            return Err(CommerceError::ValidationError(format!(
                "stock count for {} is negative",
                self.id
            )));
        }
        Ok(())
    }

    /// Check if the product is discounted against its original price.
    pub fn is_on_sale(&self) -> bool {
        self.original_price
            .map(|op| op.amount_minor > self.price.amount_minor)
            .unwrap_or(false)
    }

    /// Discount percentage if on sale.
    pub fn discount_percentage(&self) -> Option<f64> {
        self.original_price.and_then(|op| {
            if op.amount_minor > self.price.amount_minor && op.amount_minor > 0 {
                let savings = op.amount_minor - self.price.amount_minor;
                Some((savings as f64 / op.amount_minor as f64) * 100.0)
            } else {
                None
            }
        })
    }

    /// Cover image, if any.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Look up a specification value by name (case-insensitive).
    pub fn specification(&self, name: &str) -> Option<&str> {
        self.specifications
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.value.as_str())
    }

    /// Add a tag to this product.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }
}
