//! Product management.

use crate::error::AdminError;
use mobi_auth::{require, AuthUser, PermAction, Permission, Resource};
use mobi_commerce::catalog::Product;
use mobi_commerce::current_timestamp;
use mobi_commerce::ids::ProductId;
use mobi_commerce::search::{SearchFilters, SearchPage};
use mobi_data::catalog::product_query;
use mobi_data::{Backend, BackendExt, Table, TableQuery};
use serde_json::json;

const fn perm(action: PermAction) -> Permission {
    Permission::new(Resource::Products, action)
}

/// Catalog maintenance for staff.
pub struct ProductService<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> ProductService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// List products, including inactive ones.
    pub async fn list(
        &self,
        actor: &AuthUser,
        filters: &SearchFilters,
        text: &str,
    ) -> Result<SearchPage, AdminError> {
        require(Some(actor), perm(PermAction::Read))?;

        let mut query = product_query(filters, text);
        query.filters.retain(|f| f.column != "is_active");

        let total = self.backend.count(&query).await?;
        let products: Vec<Product> = self.backend.select_as(&query).await?;
        let page = if filters.limit > 0 {
            filters.offset.max(0) / filters.limit + 1
        } else {
            1
        };
        Ok(SearchPage::new(products, total, page, filters.limit))
    }

    pub async fn get(&self, actor: &AuthUser, id: &ProductId) -> Result<Product, AdminError> {
        require(Some(actor), perm(PermAction::Read))?;
        self.backend
            .select_one(&by_id(id))
            .await?
            .ok_or_else(|| AdminError::not_found("product", id.as_str()))
    }

    /// Validate and insert a new product.
    pub async fn create(&self, actor: &AuthUser, product: &Product) -> Result<Product, AdminError> {
        require(Some(actor), perm(PermAction::Create))?;
        product.validate()?;

        let created: Product = self.backend.insert_as(Table::Products, product).await?;
        tracing::info!(product = %created.id, actor = %actor.id, "product created");
        Ok(created)
    }

    /// Replace a product's stored fields.
    pub async fn update(&self, actor: &AuthUser, product: &Product) -> Result<Product, AdminError> {
        require(Some(actor), perm(PermAction::Update))?;
        product.validate()?;

        let mut patch = serde_json::to_value(product)?;
        if let Some(object) = patch.as_object_mut() {
            object.remove("id");
            object.remove("created_at");
            object.insert("updated_at".to_string(), json!(current_timestamp()));
        }

        let updated = self.write(&product.id, patch).await?;
        tracing::info!(product = %updated.id, actor = %actor.id, "product updated");
        Ok(updated)
    }

    /// Set the stock count. Negative counts are rejected.
    pub async fn update_stock(
        &self,
        actor: &AuthUser,
        id: &ProductId,
        stock_count: i64,
    ) -> Result<Product, AdminError> {
        require(Some(actor), perm(PermAction::Update))?;
        if stock_count < 0 {
            return Err(AdminError::Validation(format!(
                "stock count must not be negative (got {})",
                stock_count
            )));
        }

        let patch = json!({ "stock_count": stock_count, "updated_at": current_timestamp() });
        let updated = self.write(id, patch).await?;
        tracing::info!(product = %id, stock_count, actor = %actor.id, "stock updated");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &AuthUser, id: &ProductId) -> Result<(), AdminError> {
        require(Some(actor), perm(PermAction::Delete))?;
        let removed = self.backend.delete(&by_id(id)).await?;
        if removed.is_empty() {
            return Err(AdminError::not_found("product", id.as_str()));
        }
        tracing::info!(product = %id, actor = %actor.id, "product deleted");
        Ok(())
    }

    async fn write(&self, id: &ProductId, patch: serde_json::Value) -> Result<Product, AdminError> {
        self.backend
            .update_as::<Product>(&by_id(id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::not_found("product", id.as_str()))
    }
}

fn by_id(id: &ProductId) -> TableQuery {
    TableQuery::new(Table::Products).eq("id", id.as_str())
}
