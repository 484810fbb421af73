//! Search filter types.

use crate::catalog::Product;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: i64 = 12;

/// Sort options for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Newest first.
    #[default]
    Newest,
    /// Price, low to high.
    PriceAsc,
    /// Price, high to low.
    PriceDesc,
    /// Highest rated first.
    Rating,
    /// Most reviewed first.
    Popular,
    /// Name A-Z.
    NameAsc,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::Rating => "rating",
            SortOption::Popular => "popular",
            SortOption::NameAsc => "name_asc",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::Rating => "Highest Rated",
            SortOption::Popular => "Most Popular",
            SortOption::NameAsc => "Name: A-Z",
        }
    }

    /// Compare two products under this ordering.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Newest => b.created_at.cmp(&a.created_at),
            SortOption::PriceAsc => a.price.amount_minor.cmp(&b.price.amount_minor),
            SortOption::PriceDesc => b.price.amount_minor.cmp(&a.price.amount_minor),
            SortOption::Rating => b.rating.total_cmp(&a.rating),
            SortOption::Popular => b.review_count.cmp(&a.review_count),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PriceRange {
    pub min: Option<Money>,
    pub max: Option<Money>,
}

impl PriceRange {
    pub fn new(min: Option<Money>, max: Option<Money>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, price: &Money) -> bool {
        let above_min = self
            .min
            .map(|m| price.amount_minor >= m.amount_minor)
            .unwrap_or(true);
        let below_max = self
            .max
            .map(|m| price.amount_minor <= m.amount_minor)
            .unwrap_or(true);
        above_min && below_max
    }
}

/// Structured filter criteria plus the pagination cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Category slug.
    pub category: Option<String>,
    /// Brands (OR).
    pub brands: Vec<String>,
    /// Price bounds.
    pub price_range: Option<PriceRange>,
    /// Minimum average rating.
    pub min_rating: Option<f64>,
    /// Only products that can be bought now.
    pub in_stock_only: bool,
    /// Sort key.
    pub sort: SortOption,
    /// Pagination offset.
    pub offset: i64,
    /// Page size.
    pub limit: i64,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            category: None,
            brands: Vec::new(),
            price_range: None,
            min_rating: None,
            in_stock_only: false,
            sort: SortOption::default(),
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchFilters {
    /// Shallow-merge a patch. Pagination is not touched here.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(brands) = patch.brands {
            self.brands = brands;
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
        if let Some(min_rating) = patch.min_rating {
            self.min_rating = min_rating;
        }
        if let Some(in_stock_only) = patch.in_stock_only {
            self.in_stock_only = in_stock_only;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
    }

    /// Move the cursor back to the first page.
    pub fn reset_pagination(&mut self) {
        self.offset = 0;
    }

    /// Whether any narrowing criterion is set.
    pub fn is_active(&self) -> bool {
        self.category.is_some()
            || !self.brands.is_empty()
            || self.price_range.is_some()
            || self.min_rating.is_some()
            || self.in_stock_only
    }

    /// Check a product against the criteria and a free-text query.
    pub fn matches(&self, product: &Product, query: &str) -> bool {
        if let Some(ref category) = self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if !self.brands.is_empty()
            && !self
                .brands
                .iter()
                .any(|b| b.eq_ignore_ascii_case(&product.brand))
        {
            return false;
        }
        if let Some(range) = self.price_range {
            if !range.contains(&product.price) {
                return false;
            }
        }
        if let Some(min_rating) = self.min_rating {
            if product.rating < min_rating {
                return false;
            }
        }
        if self.in_stock_only && !product.in_stock() {
            return false;
        }
        matches_query(product, query)
    }

    /// Filter, sort, and return the total count plus the requested page.
    pub fn apply<'a>(&self, products: &'a [Product], query: &str) -> (i64, Vec<&'a Product>) {
        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| self.matches(p, query))
            .collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));

        let total = matched.len() as i64;
        let offset = self.offset.max(0) as usize;
        let limit = if self.limit > 0 {
            self.limit as usize
        } else {
            matched.len()
        };
        let page = matched.into_iter().skip(offset).take(limit).collect();
        (total, page)
    }
}

/// Case-insensitive match of every query word against name, brand,
/// description, and tags. An empty query matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        product.name,
        product.brand,
        product.description,
        product.tags.join(" ")
    )
    .to_lowercase();

    query
        .split_whitespace()
        .all(|word| haystack.contains(&word.to_lowercase()))
}

/// A partial update to [`SearchFilters`].
///
/// Outer `None` leaves a field alone. For optional criteria, `Some(None)`
/// clears them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Option<PriceRange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_stock_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(Some(category.into()));
        self
    }

    pub fn clear_category(mut self) -> Self {
        self.category = Some(None);
        self
    }

    pub fn brands<S: Into<String>>(mut self, brands: impl IntoIterator<Item = S>) -> Self {
        self.brands = Some(brands.into_iter().map(Into::into).collect());
        self
    }

    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.price_range = Some(Some(PriceRange::new(min, max)));
        self
    }

    pub fn min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(Some(rating));
        self
    }

    pub fn in_stock_only(mut self, enabled: bool) -> Self {
        self.in_stock_only = Some(enabled);
        self
    }

    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}
