//! User service - Handles user administration business logic.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Password hashing lives in the domain Password value object.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewAuditLog, Password, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{AuditRepository, UserRepository};
use crate::types::PaginationParams;

/// Fields accepted when creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role_ids: Vec<Uuid>,
}

/// Fields accepted when updating a user
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub active: Option<bool>,
    pub role_ids: Option<Vec<Uuid>>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)>;

    async fn create_user(&self, new_user: NewUser, actor: &str) -> AppResult<User>;

    async fn update_user(&self, id: Uuid, update: UserUpdate, actor: &str) -> AppResult<User>;

    async fn reset_password(&self, id: Uuid, password: String, actor: &str) -> AppResult<()>;

    /// Hard delete. Audit rows and uploaded documents survive with their
    /// user reference nulled by the database.
    async fn delete_user(&self, id: Uuid, actor: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService.
pub struct UserManager {
    users: Arc<dyn UserRepository>,
    audit: Arc<dyn AuditRepository>,
}

impl UserManager {
    pub fn new(users: Arc<dyn UserRepository>, audit: Arc<dyn AuditRepository>) -> Self {
        Self { users, audit }
    }

    async fn record(&self, action: &str, actor: &str, detail: String) -> AppResult<()> {
        let mut entry = NewAuditLog::new(action).detail(detail);
        entry.username = actor.to_string();
        self.audit.insert(entry).await
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_users(&self, params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        self.users.list(params).await
    }

    async fn create_user(&self, new_user: NewUser, actor: &str) -> AppResult<User> {
        if self
            .users
            .find_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("User"));
        }
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&new_user.password)?.into_string();
        let user = self
            .users
            .create(
                new_user.username,
                new_user.email,
                password_hash,
                new_user.role_ids,
            )
            .await?;

        self.record(
            "user.create",
            actor,
            format!("created user {}", user.username),
        )
        .await?;
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate, actor: &str) -> AppResult<User> {
        if let Some(email) = &update.email {
            if let Some(existing) = self.users.find_by_email(email).await? {
                if existing.id != id {
                    return Err(AppError::conflict("User"));
                }
            }
        }

        let user = self
            .users
            .update(id, update.email, update.active, update.role_ids)
            .await?;

        self.record(
            "user.update",
            actor,
            format!("updated user {}", user.username),
        )
        .await?;
        Ok(user)
    }

    async fn reset_password(&self, id: Uuid, password: String, actor: &str) -> AppResult<()> {
        let user = self.users.find_by_id(id).await?.ok_or_not_found()?;
        let password_hash = Password::new(&password)?.into_string();
        self.users.set_password(id, password_hash).await?;

        self.record(
            "user.reset_password",
            actor,
            format!("reset password for {}", user.username),
        )
        .await
    }

    async fn delete_user(&self, id: Uuid, actor: &str) -> AppResult<()> {
        let user = self.users.find_by_id(id).await?.ok_or_not_found()?;
        self.users.delete(id).await?;

        self.record(
            "user.delete",
            actor,
            format!("deleted user {}", user.username),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;
    use mockall::predicate::eq;

    struct NoopAudit;

    #[async_trait]
    impl AuditRepository for NoopAudit {
        async fn insert(&self, _entry: NewAuditLog) -> AppResult<()> {
            Ok(())
        }

        async fn list(
            &self,
            _filter: &crate::infra::repositories::AuditFilter,
            _params: &PaginationParams,
        ) -> AppResult<(Vec<crate::domain::AuditLog>, u64)> {
            Ok((vec![], 0))
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .with(eq("jdoe"))
            .returning(|_| {
                Ok(Some(User {
                    id: Uuid::new_v4(),
                    username: "jdoe".into(),
                    email: "j@example.com".into(),
                    password_hash: String::new(),
                    active: true,
                    roles: vec![],
                    created_at: chrono::Utc::now(),
                    updated_at: chrono::Utc::now(),
                }))
            });

        let service = UserManager::new(Arc::new(users), Arc::new(NoopAudit));
        let result = service
            .create_user(
                NewUser {
                    username: "jdoe".into(),
                    email: "new@example.com".into(),
                    password: "long-enough-pw".into(),
                    role_ids: vec![],
                },
                "admin",
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn delete_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(users), Arc::new(NoopAudit));
        let result = service.delete_user(Uuid::new_v4(), "admin").await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }
}
