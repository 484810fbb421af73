//! Category management.

use crate::error::AdminError;
use mobi_auth::{require, AuthUser, PermAction, Permission, Resource};
use mobi_commerce::catalog::{sort_for_display, Category};
use mobi_commerce::ids::CategoryId;
use mobi_data::{Backend, BackendExt, Table, TableQuery};

const fn perm(action: PermAction) -> Permission {
    Permission::new(Resource::Categories, action)
}

pub struct CategoryService<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> CategoryService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// All categories, active or not, in display order.
    pub async fn list(&self, actor: &AuthUser) -> Result<Vec<Category>, AdminError> {
        require(Some(actor), perm(PermAction::Read))?;
        let mut categories: Vec<Category> = self
            .backend
            .select_as(&TableQuery::new(Table::Categories))
            .await?;
        sort_for_display(&mut categories);
        Ok(categories)
    }

    /// Insert a category. An empty slug is derived from the name.
    pub async fn create(
        &self,
        actor: &AuthUser,
        category: &Category,
    ) -> Result<Category, AdminError> {
        require(Some(actor), perm(PermAction::Create))?;
        let category = normalized(category)?;

        let by_slug = TableQuery::new(Table::Categories).eq("slug", category.slug.as_str());
        let taken = self.backend.select_one::<Category>(&by_slug).await?;
        if taken.is_some() {
            return Err(AdminError::Validation(format!(
                "slug '{}' is already in use",
                category.slug
            )));
        }

        let created: Category = self.backend.insert_as(Table::Categories, &category).await?;
        tracing::info!(
            category = %created.id,
            slug = %created.slug,
            actor = %actor.id,
            "category created"
        );
        Ok(created)
    }

    pub async fn update(
        &self,
        actor: &AuthUser,
        category: &Category,
    ) -> Result<Category, AdminError> {
        require(Some(actor), perm(PermAction::Update))?;
        let category = normalized(category)?;

        let mut patch = serde_json::to_value(&category)?;
        if let Some(object) = patch.as_object_mut() {
            object.remove("id");
            object.remove("created_at");
        }
        let updated = self
            .backend
            .update_as::<Category>(&by_id(&category.id), patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::not_found("category", category.id.as_str()))?;

        tracing::info!(category = %updated.id, actor = %actor.id, "category updated");
        Ok(updated)
    }

    pub async fn delete(&self, actor: &AuthUser, id: &CategoryId) -> Result<(), AdminError> {
        require(Some(actor), perm(PermAction::Delete))?;
        let removed = self.backend.delete(&by_id(id)).await?;
        if removed.is_empty() {
            return Err(AdminError::not_found("category", id.as_str()));
        }
        tracing::info!(category = %id, actor = %actor.id, "category deleted");
        Ok(())
    }
}

fn by_id(id: &CategoryId) -> TableQuery {
    TableQuery::new(Table::Categories).eq("id", id.as_str())
}

fn normalized(category: &Category) -> Result<Category, AdminError> {
    if category.name.trim().is_empty() {
        return Err(AdminError::Validation("category name is required".to_string()));
    }
    let mut category = category.clone();
    if category.slug.trim().is_empty() {
        category.slug = Category::slugify(&category.name);
    }
    Ok(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_auth::Role;
    use mobi_commerce::ids::UserId;
    use mobi_data::MemoryBackend;

    fn user(role: Role) -> AuthUser {
        AuthUser::new(UserId::new("u"), "u@mobistore.kw", role)
    }

    #[tokio::test]
    async fn test_create_derives_slug() {
        let backend = MemoryBackend::new();
        let service = CategoryService::new(&backend);

        let created = service
            .create(&user(Role::Editor), &Category::new("Smart Watches", ""))
            .await
            .unwrap();
        assert_eq!(created.slug, "smart-watches");

        let err = service
            .create(&user(Role::Editor), &Category::new("Smart watches", "smart-watches"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_in_display_order() {
        let mut phones = Category::new("Phones", "phones");
        phones.sort_order = 2;
        let mut cases = Category::new("Cases", "cases");
        cases.sort_order = 1;
        let backend = MemoryBackend::new()
            .with_records(Table::Categories, vec![phones, cases])
            .unwrap();

        let list = CategoryService::new(&backend)
            .list(&user(Role::Viewer))
            .await
            .unwrap();
        let slugs: Vec<_> = list.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["cases", "phones"]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let category = Category::new("Tablets", "tablets");
        let backend = MemoryBackend::new()
            .with_records(Table::Categories, vec![category.clone()])
            .unwrap();
        let service = CategoryService::new(&backend);

        let mut renamed = category.clone();
        renamed.name = "Tablets & iPads".to_string();
        let updated = service.update(&user(Role::Editor), &renamed).await.unwrap();
        assert_eq!(updated.name, "Tablets & iPads");

        let err = service.delete(&user(Role::Editor), &category.id).await.unwrap_err();
        assert!(err.is_permission_error());
        service.delete(&user(Role::Manager), &category.id).await.unwrap();
        assert!(backend.rows(Table::Categories).is_empty());
    }
}
