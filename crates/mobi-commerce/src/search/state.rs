//! Search state driving a product listing view.

use crate::catalog::Product;
use crate::search::results::total_pages;
use crate::search::{FilterPatch, SearchFilters, SearchPage};
use serde::{Deserialize, Serialize};

/// Query text, filters, the current result page, and a loading flag.
///
/// Any change to the query or the filters puts the cursor back on page 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub query: String,
    pub filters: SearchFilters,
    pub results: Vec<Product>,
    pub total_results: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub loading: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            filters: SearchFilters::default(),
            results: Vec::new(),
            total_results: 0,
            current_page: 1,
            total_pages: 0,
            loading: false,
        }
    }
}

impl SearchState {
    /// Replace the query text and restart pagination.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.restart_pagination();
    }

    /// Merge a filter patch and restart pagination.
    pub fn apply_filters(&mut self, patch: FilterPatch) {
        self.filters.merge(patch);
        self.restart_pagination();
    }

    /// Install a result page and clear the loading flag.
    ///
    /// The filter cursor is aligned with the page so that
    /// `offset == (page - 1) * limit` keeps holding.
    pub fn set_results(&mut self, page: SearchPage) {
        self.total_pages = total_pages(page.total, page.limit);
        self.total_results = page.total;
        self.current_page = page.page.max(1);
        self.results = page.products;
        if page.limit > 0 {
            self.filters.limit = page.limit;
            self.filters.offset = (page.page.max(1) - 1) * page.limit;
        }
        self.loading = false;
    }

    /// Move to another page of the current query. The caller fetches it.
    pub fn go_to_page(&mut self, page: i64) {
        let page = page.max(1);
        self.current_page = page;
        self.filters.offset = (page - 1) * self.filters.limit.max(0);
    }

    fn restart_pagination(&mut self) {
        self.filters.reset_pagination();
        self.current_page = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("P{}", i), "Acme", "smartphones", Money::kwd(1_000)))
            .collect()
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = SearchState::default();
        state.set_results(SearchPage::new(products(12), 60, 3, 12));
        assert_eq!(state.current_page, 3);
        assert_eq!(state.filters.offset, 24);

        state.apply_filters(FilterPatch::new().brands(["Apple"]));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.filters.offset, 0);
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut state = SearchState::default();
        state.go_to_page(4);
        state.set_query("galaxy");
        assert_eq!(state.query, "galaxy");
        assert_eq!(state.current_page, 1);
        assert_eq!(state.filters.offset, 0);
    }

    #[test]
    fn test_set_results_computes_pages() {
        let mut state = SearchState {
            loading: true,
            ..Default::default()
        };
        state.set_results(SearchPage::new(products(12), 37, 2, 12));

        assert_eq!(state.total_pages, 4);
        assert_eq!(state.total_results, 37);
        assert_eq!(state.results.len(), 12);
        assert!(!state.loading);
    }

    #[test]
    fn test_set_results_non_positive_limit() {
        let mut state = SearchState::default();
        state.set_results(SearchPage::new(products(3), 3, 1, 0));
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.filters.limit, 12);
    }

    #[test]
    fn test_set_results_clamps_page_to_first() {
        let mut state = SearchState::default();
        state.set_results(SearchPage::new(products(12), 30, 0, 12));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.filters.offset, 0);

        state.set_results(SearchPage::new(products(12), 30, -2, 12));
        assert_eq!(state.current_page, 1);
        assert_eq!(state.filters.offset, 0);
    }
}
