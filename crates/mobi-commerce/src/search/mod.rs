//! Search module.
//!
//! Contains filter criteria, the listing state, and pagination.

mod filter;
mod results;
mod state;

pub use filter::{
    matches_query, FilterPatch, PriceRange, SearchFilters, SortOption, DEFAULT_PAGE_SIZE,
};
pub use results::{total_pages, Pagination, SearchPage};
pub use state::SearchState;
