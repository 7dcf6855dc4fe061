//! Audit log repository.
//!
//! Append-only: exposes insert and list operations only. No update or
//! delete exists anywhere in the crate for audit rows.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::audit_log;
use crate::domain::{AuditLog, NewAuditLog};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Filters for listing audit logs
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
}

/// Audit repository trait for dependency injection.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn insert(&self, entry: NewAuditLog) -> AppResult<()>;

    /// List ordered by created_at (then id for a stable tiebreak).
    async fn list(
        &self,
        filter: &AuditFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AuditLog>, u64)>;
}

/// Concrete implementation of AuditRepository
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: audit_log::Model) -> AuditLog {
    AuditLog {
        id: m.id,
        user_id: m.user_id,
        username: m.username,
        action: m.action,
        ip: m.ip,
        detail: m.detail,
        sql_text: m.sql_text,
        response_summary: m.response_summary,
        created_at: m.created_at,
    }
}

#[async_trait]
impl AuditRepository for AuditStore {
    async fn insert(&self, entry: NewAuditLog) -> AppResult<()> {
        audit_log::ActiveModel {
            id: NotSet,
            user_id: Set(entry.user_id),
            username: Set(entry.username),
            action: Set(entry.action),
            ip: Set(entry.ip),
            detail: Set(entry.detail),
            sql_text: Set(entry.sql_text),
            response_summary: Set(entry.response_summary),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &AuditFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<AuditLog>, u64)> {
        let mut query = audit_log::Entity::find()
            .order_by_desc(audit_log::Column::CreatedAt)
            .order_by_desc(audit_log::Column::Id);

        if let Some(user_id) = filter.user_id {
            query = query.filter(audit_log::Column::UserId.eq(user_id));
        }
        if let Some(action) = &filter.action {
            query = query.filter(audit_log::Column::Action.eq(action.clone()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(to_domain).collect(), total))
    }
}
