//! Catalog reads used by the storefront listing pages.

use crate::backend::{Backend, BackendExt};
use crate::error::FetchError;
use crate::query::TableQuery;
use crate::table::Table;
use mobi_commerce::catalog::{Category, Product};
use mobi_commerce::search::{SearchFilters, SearchPage, SortOption};

/// Build the products query for a filter set and free-text query.
///
/// Only active products are listed. The window comes from the filters'
/// offset and limit.
pub fn product_query(filters: &SearchFilters, text: &str) -> TableQuery {
    let mut query = TableQuery::new(Table::Products).eq("is_active", true);

    if let Some(ref category) = filters.category {
        query = query.eq("category", category.as_str());
    }
    if !filters.brands.is_empty() {
        query = query.in_list("brand", filters.brands.iter().map(String::as_str));
    }
    if let Some(range) = filters.price_range {
        if let Some(min) = range.min {
            query = query.gte("price->amount_minor", min.amount_minor);
        }
        if let Some(max) = range.max {
            query = query.lte("price->amount_minor", max.amount_minor);
        }
    }
    if let Some(rating) = filters.min_rating {
        query = query.gte("rating", rating);
    }
    if filters.in_stock_only {
        query = query.gt("stock_count", 0);
    }
    let text = text.trim();
    if !text.is_empty() {
        query = query.ilike("name", format!("*{}*", text));
    }

    query = match filters.sort {
        SortOption::Newest => query.order_desc("created_at"),
        SortOption::PriceAsc => query.order_asc("price->amount_minor"),
        SortOption::PriceDesc => query.order_desc("price->amount_minor"),
        SortOption::Rating => query.order_desc("rating"),
        SortOption::Popular => query.order_desc("review_count"),
        SortOption::NameAsc => query.order_asc("name"),
    };

    if filters.limit > 0 {
        query = query.limit(filters.limit);
    }
    query.offset(filters.offset.max(0))
}

/// Fetch one listing page: the window of products plus the total match
/// count.
pub async fn fetch_products<B: Backend + ?Sized>(
    backend: &B,
    filters: &SearchFilters,
    text: &str,
) -> Result<SearchPage, FetchError> {
    let query = product_query(filters, text);
    let total = backend.count(&query).await?;
    let products: Vec<Product> = backend.select_as(&query).await?;
    let page = if filters.limit > 0 {
        filters.offset.max(0) / filters.limit + 1
    } else {
        1
    };
    tracing::debug!(total, page, returned = products.len(), "fetched product page");
    Ok(SearchPage::new(products, total, page, filters.limit))
}

/// Active categories in display order.
pub async fn fetch_categories<B: Backend + ?Sized>(
    backend: &B,
) -> Result<Vec<Category>, FetchError> {
    let query = TableQuery::new(Table::Categories)
        .eq("is_active", true)
        .order_asc("sort_order")
        .order_asc("name");
    backend.select_as(&query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use mobi_commerce::money::Money;
    use mobi_commerce::search::FilterPatch;

    fn phone(id: &str, brand: &str, fils: i64, stock: i64) -> Product {
        Product::new(format!("{} {}", brand, id), brand, "smartphones", Money::kwd(fils))
            .with_id(id)
            .with_stock(stock)
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_records(
                Table::Products,
                vec![
                    phone("a", "Apple", 300_000, 3),
                    phone("b", "Samsung", 250_000, 0),
                    phone("c", "Apple", 150_000, 9),
                    phone("d", "Xiaomi", 90_000, 1),
                ],
            )
            .unwrap()
    }

    #[test]
    fn test_product_query_pairs() {
        let mut filters = SearchFilters::default();
        filters.merge(
            FilterPatch::new()
                .category("smartphones")
                .brands(["Apple"])
                .in_stock_only(true)
                .sort(SortOption::PriceAsc),
        );

        let pairs = product_query(&filters, "pro").to_query_pairs();
        let rendered: Vec<String> = pairs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        assert_eq!(
            rendered,
            vec![
                "select=*",
                "is_active=eq.true",
                "category=eq.smartphones",
                "brand=in.(Apple)",
                "stock_count=gt.0",
                "name=ilike.*pro*",
                "order=price->amount_minor.asc",
                "limit=12",
                "offset=0",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_products_page() {
        let backend = backend();
        let filters = SearchFilters {
            sort: SortOption::PriceDesc,
            limit: 2,
            offset: 2,
            ..Default::default()
        };

        let page = fetch_products(&backend, &filters, "").await.unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.page, 2);
        let ids: Vec<_> = page.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_fetch_products_filters() {
        let backend = backend();
        let mut filters = SearchFilters::default();
        filters.merge(
            FilterPatch::new()
                .price_range(Some(Money::kwd(100_000)), None)
                .in_stock_only(true),
        );

        let page = fetch_products(&backend, &filters, "").await.unwrap();
        assert_eq!(page.total, 2);
        assert!(page.products.iter().all(|p| p.in_stock()));
    }
}
