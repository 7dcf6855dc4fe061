//! Role service - Role and permission administration.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::ROLE_ADMIN;
use crate::domain::{NewAuditLog, Permission, Role};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{AuditRepository, RoleRepository};

/// Role service trait for dependency injection.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn get_role(&self, id: Uuid) -> AppResult<Role>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    async fn create_role(&self, name: String, description: String, actor: &str)
        -> AppResult<Role>;

    async fn update_role(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        permission_ids: Option<Vec<Uuid>>,
        actor: &str,
    ) -> AppResult<Role>;

    /// The `admin` role cannot be deleted.
    async fn delete_role(&self, id: Uuid, actor: &str) -> AppResult<()>;

    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;
}

/// Concrete implementation of RoleService.
pub struct RoleManager {
    roles: Arc<dyn RoleRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl RoleManager {
    pub fn new(roles: Arc<dyn RoleRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { roles, audit }
    }

    async fn record(&self, action: &str, actor: &str, detail: String) -> AppResult<()> {
        let mut entry = NewAuditLog::new(action).detail(detail);
        entry.username = actor.to_string();
        self.audit.insert(entry).await
    }
}

#[async_trait]
impl RoleService for RoleManager {
    async fn get_role(&self, id: Uuid) -> AppResult<Role> {
        self.roles.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }

    async fn create_role(
        &self,
        name: String,
        description: String,
        actor: &str,
    ) -> AppResult<Role> {
        if self.roles.find_by_name(&name).await?.is_some() {
            return Err(AppError::conflict("Role"));
        }

        let role = self.roles.create(name, description).await?;
        self.record("role.create", actor, format!("created role {}", role.name))
            .await?;
        Ok(role)
    }

    async fn update_role(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        permission_ids: Option<Vec<Uuid>>,
        actor: &str,
    ) -> AppResult<Role> {
        let existing = self.roles.find_by_id(id).await?.ok_or_not_found()?;

        if existing.is_protected() {
            if let Some(new_name) = &name {
                if new_name != ROLE_ADMIN {
                    return Err(AppError::validation(
                        "The admin role cannot be renamed",
                    ));
                }
            }
        }

        if let Some(new_name) = &name {
            if let Some(other) = self.roles.find_by_name(new_name).await? {
                if other.id != id {
                    return Err(AppError::conflict("Role"));
                }
            }
        }

        let role = self
            .roles
            .update(id, name, description, permission_ids)
            .await?;
        self.record("role.update", actor, format!("updated role {}", role.name))
            .await?;
        Ok(role)
    }

    async fn delete_role(&self, id: Uuid, actor: &str) -> AppResult<()> {
        let role = self.roles.find_by_id(id).await?.ok_or_not_found()?;
        if role.is_protected() {
            return Err(AppError::validation("The admin role cannot be deleted"));
        }

        self.roles.delete(id).await?;
        self.record("role.delete", actor, format!("deleted role {}", role.name))
            .await
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        self.roles.list_permissions().await
    }
}
