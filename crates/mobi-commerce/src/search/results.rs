//! Search results and pagination.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Pagination info derived from a result page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: i64,
    /// Items per page.
    pub per_page: i64,
    /// Total number of items.
    pub total: i64,
    /// Total number of pages.
    pub total_pages: i64,
}

impl Pagination {
    /// Create pagination info.
    ///
    /// `total_pages` is `ceil(total / per_page)`, or 1 when `per_page` is not
    /// positive.
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total_pages(total, per_page),
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.per_page.max(0)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Page numbers for a pager with at most `max_visible` buttons.
    pub fn page_numbers(&self, max_visible: usize) -> Vec<i64> {
        if self.total_pages as usize <= max_visible {
            return (1..=self.total_pages).collect();
        }

        let half = max_visible / 2;
        let start = (self.page - half as i64).max(1);
        let end = (start + max_visible as i64 - 1).min(self.total_pages);
        let start = (end - max_visible as i64 + 1).max(1);

        (start..=end).collect()
    }

    /// 1-indexed number of the first item shown, 0 when empty.
    pub fn start_item(&self) -> i64 {
        if self.total == 0 {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Number of the last item shown.
    pub fn end_item(&self) -> i64 {
        (self.page * self.per_page).min(self.total)
    }
}

/// `ceil(total / per_page)`, or 1 when `per_page <= 0`.
pub fn total_pages(total: i64, per_page: i64) -> i64 {
    if per_page <= 0 {
        return 1;
    }
    let total = total.max(0);
    total / per_page + i64::from(total % per_page != 0)
}

/// One page of results as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchPage {
    /// Products on this page.
    pub products: Vec<Product>,
    /// Total matching products across all pages.
    pub total: i64,
    /// Page number (1-indexed).
    pub page: i64,
    /// Page size used for the request.
    pub limit: i64,
}

impl SearchPage {
    pub fn new(products: Vec<Product>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            products,
            total,
            page,
            limit,
        }
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(37, 12), 4);
        assert_eq!(total_pages(36, 12), 3);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(50, 0), 1);
        assert_eq!(total_pages(50, -3), 1);
    }

    #[test]
    fn test_total_pages_near_max() {
        assert_eq!(total_pages(i64::MAX, 12), i64::MAX / 12 + 1);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_pagination_basics() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.total_pages, 5);
        assert!(p.has_next());
        assert!(p.has_prev());
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn test_pagination_last_page() {
        let p = Pagination::new(5, 10, 45);
        assert!(p.has_prev());
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_page_numbers() {
        let p = Pagination::new(5, 10, 100);
        assert_eq!(p.page_numbers(5), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_pagination_item_range() {
        let p = Pagination::new(2, 10, 45);
        assert_eq!(p.start_item(), 11);
        assert_eq!(p.end_item(), 20);
    }
}
