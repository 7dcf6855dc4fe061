//! Role and permission repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{permission, role, role_permission};
use crate::domain::{Permission, Role};
use crate::errors::{AppError, AppResult};

/// Map entity models to the domain role type.
pub(crate) fn role_to_domain(r: role::Model, perms: Vec<permission::Model>) -> Role {
    Role {
        id: r.id,
        name: r.name,
        description: r.description,
        permissions: perms
            .into_iter()
            .map(|p| Permission {
                id: p.id,
                name: p.name,
                description: p.description,
            })
            .collect(),
    }
}

/// Role repository trait for dependency injection.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn list(&self) -> AppResult<Vec<Role>>;

    async fn create(&self, name: String, description: String) -> AppResult<Role>;

    /// Update name/description; `permission_ids` replaces the set when present.
    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        permission_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Role>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Read-only permission catalogue seeded by migration.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;
}

/// Concrete implementation of RoleRepository
pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn hydrate(&self, model: role::Model) -> AppResult<Role> {
        let perms = model
            .find_related(permission::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(role_to_domain(model, perms))
    }

    async fn replace_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> AppResult<()> {
        role_permission::Entity::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        for pid in permission_ids {
            role_permission::ActiveModel {
                role_id: Set(role_id),
                permission_id: Set(*pid),
            }
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        }
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        let model = role::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let model = role::Entity::find()
            .filter(role::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = role::Entity::find()
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut roles = Vec::with_capacity(models.len());
        for m in models {
            roles.push(self.hydrate(m).await?);
        }
        Ok(roles)
    }

    async fn create(&self, name: String, description: String) -> AppResult<Role> {
        let model = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        self.hydrate(model).await
    }

    async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
        permission_ids: Option<Vec<Uuid>>,
    ) -> AppResult<Role> {
        let model = role::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active_model: role::ActiveModel = model.into();
        if let Some(name) = name {
            active_model.name = Set(name);
        }
        if let Some(description) = description {
            active_model.description = Set(description);
        }
        let model = active_model.update(&self.db).await.map_err(AppError::from)?;

        if let Some(permission_ids) = permission_ids {
            self.replace_permissions(id, &permission_ids).await?;
        }
        self.hydrate(model).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = role::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_permissions(&self) -> AppResult<Vec<Permission>> {
        let models = permission::Entity::find()
            .order_by_asc(permission::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .map(|p| Permission {
                id: p.id,
                name: p.name,
                description: p.description,
            })
            .collect())
    }
}
