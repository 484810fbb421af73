//! User profiles and role assignment.

use crate::error::AdminError;
use mobi_auth::{require, AuthError, AuthUser, PermAction, Permission, Resource, Role};
use mobi_commerce::current_timestamp;
use mobi_commerce::ids::UserId;
use mobi_data::{Backend, BackendExt, Table, TableQuery};
use serde_json::json;

pub struct UserService<'a, B: Backend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> UserService<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Profiles, newest first.
    pub async fn list(&self, actor: &AuthUser) -> Result<Vec<AuthUser>, AdminError> {
        require(Some(actor), Permission::new(Resource::Users, PermAction::Read))?;
        let query = TableQuery::new(Table::Profiles).order_desc("created_at");
        Ok(self.backend.select_as(&query).await?)
    }

    /// Give `user_id` a new role.
    ///
    /// Needs `users.update`, and only a super admin may hand out
    /// [`Role::SuperAdmin`].
    pub async fn change_role(
        &self,
        actor: &AuthUser,
        user_id: &UserId,
        role: Role,
    ) -> Result<AuthUser, AdminError> {
        require(Some(actor), Permission::new(Resource::Users, PermAction::Update))?;

        let allowed = actor.role.map(|r| r.can_assign(role)).unwrap_or(false);
        if !allowed {
            tracing::warn!(
                actor = %actor.id,
                target = %user_id,
                role = role.as_str(),
                "role assignment denied"
            );
            return Err(AuthError::InsufficientPermissions {
                role: actor.role.map(|r| r.as_str()).unwrap_or("none").to_string(),
                permission: format!("assign {}", role.as_str()),
            }
            .into());
        }

        let query = TableQuery::new(Table::Profiles).eq("id", user_id.as_str());
        let patch = json!({ "role": role, "updated_at": current_timestamp() });
        let updated = self
            .backend
            .update_as::<AuthUser>(&query, patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AdminError::not_found("user", user_id.as_str()))?;

        tracing::info!(actor = %actor.id, target = %user_id, role = role.as_str(), "role changed");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobi_data::MemoryBackend;

    fn user(id: &str, role: Role) -> AuthUser {
        AuthUser::new(UserId::new(id), format!("{}@mobistore.kw", id), role)
    }

    fn backend() -> MemoryBackend {
        MemoryBackend::new()
            .with_records(
                Table::Profiles,
                vec![user("u1", Role::Customer), user("u2", Role::Editor)],
            )
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_requires_users_read() {
        let backend = backend();
        let service = UserService::new(&backend);

        assert_eq!(service.list(&user("v", Role::Viewer)).await.unwrap().len(), 2);
        let err = service.list(&user("e", Role::Editor)).await.unwrap_err();
        assert!(err.is_permission_error());
    }

    #[tokio::test]
    async fn test_admin_changes_role() {
        let backend = backend();
        let service = UserService::new(&backend);

        let updated = service
            .change_role(&user("a", Role::Admin), &UserId::new("u1"), Role::Manager)
            .await
            .unwrap();
        assert_eq!(updated.role, Some(Role::Manager));
    }

    #[tokio::test]
    async fn test_only_super_admin_grants_super_admin() {
        let backend = backend();
        let service = UserService::new(&backend);

        let err = service
            .change_role(&user("a", Role::Admin), &UserId::new("u1"), Role::SuperAdmin)
            .await
            .unwrap_err();
        assert!(err.is_permission_error());

        let updated = service
            .change_role(&user("s", Role::SuperAdmin), &UserId::new("u1"), Role::SuperAdmin)
            .await
            .unwrap();
        assert_eq!(updated.role, Some(Role::SuperAdmin));
    }

    #[tokio::test]
    async fn test_manager_cannot_change_roles() {
        let backend = backend();
        let err = UserService::new(&backend)
            .change_role(&user("m", Role::Manager), &UserId::new("u1"), Role::Viewer)
            .await
            .unwrap_err();
        assert!(err.is_permission_error());
    }
}
