//! User repository.
//!
//! Users carry their role set (and each role its permissions), so reads
//! hydrate the full RBAC graph for the returned users.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{permission, role, user, user_role};
use super::role_repository::role_to_domain;
use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    /// Create a user and assign the given roles.
    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        role_ids: Vec<Uuid>,
    ) -> AppResult<User>;

    /// Update email/active flag; `role_ids` replaces the role set when present.
    async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        active: Option<bool>,
        role_ids: Option<Vec<Uuid>>,
    ) -> AppResult<User>;

    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;

    /// Hard delete. FK rules set-null dependent rows (documents, audit logs).
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Hydrate roles and their permissions for a user model.
    async fn hydrate(&self, model: user::Model) -> AppResult<User> {
        let roles = model
            .find_related(role::Entity)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut domain_roles = Vec::with_capacity(roles.len());
        for r in roles {
            let perms = r
                .find_related(permission::Entity)
                .all(&self.db)
                .await
                .map_err(AppError::from)?;
            domain_roles.push(role_to_domain(r, perms));
        }

        Ok(User {
            id: model.id,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            active: model.active,
            roles: domain_roles,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }

    async fn replace_roles(&self, user_id: Uuid, role_ids: &[Uuid]) -> AppResult<()> {
        user_role::Entity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        for role_id in role_ids {
            user_role::ActiveModel {
                user_id: Set(user_id),
                role_id: Set(*role_id),
            }
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        let paginator = user::Entity::find()
            .order_by_asc(user::Column::Username)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        let mut users = Vec::with_capacity(models.len());
        for m in models {
            users.push(self.hydrate(m).await?);
        }
        Ok((users, total))
    }

    async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        role_ids: Vec<Uuid>,
    ) -> AppResult<User> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let active_model = user::ActiveModel {
            id: Set(id),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        self.replace_roles(id, &role_ids).await?;
        self.hydrate(model).await
    }

    async fn update(
        &self,
        id: Uuid,
        email: Option<String>,
        active: Option<bool>,
        role_ids: Option<Vec<Uuid>>,
    ) -> AppResult<User> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active_model: user::ActiveModel = model.into();
        if let Some(email) = email {
            active_model.email = Set(email);
        }
        if let Some(active) = active {
            active_model.active = Set(active);
        }
        active_model.updated_at = Set(Utc::now());

        let model = active_model.update(&self.db).await.map_err(AppError::from)?;

        if let Some(role_ids) = role_ids {
            self.replace_roles(id, &role_ids).await?;
        }
        self.hydrate(model).await
    }

    async fn set_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active_model: user::ActiveModel = model.into();
        active_model.password_hash = Set(password_hash);
        active_model.updated_at = Set(Utc::now());
        active_model.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = user::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
