//! Query sample repository (cache of successful question -> SQL pairs).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};
use uuid::Uuid;

use super::entities::query_sample;
use crate::domain::QuerySample;
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Query sample repository trait for dependency injection.
#[async_trait]
pub trait QuerySampleRepository: Send + Sync {
    async fn insert(
        &self,
        question: String,
        sql_text: String,
        created_by: Option<Uuid>,
    ) -> AppResult<QuerySample>;

    /// Most recent samples, newest first.
    async fn recent(&self, limit: u64) -> AppResult<Vec<QuerySample>>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<QuerySample>, u64)>;
}

/// Concrete implementation of QuerySampleRepository
pub struct QuerySampleStore {
    db: DatabaseConnection,
}

impl QuerySampleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: query_sample::Model) -> QuerySample {
    QuerySample {
        id: m.id,
        question: m.question,
        sql_text: m.sql_text,
        created_by: m.created_by,
        created_at: m.created_at,
    }
}

#[async_trait]
impl QuerySampleRepository for QuerySampleStore {
    async fn insert(
        &self,
        question: String,
        sql_text: String,
        created_by: Option<Uuid>,
    ) -> AppResult<QuerySample> {
        let model = query_sample::ActiveModel {
            id: Set(Uuid::new_v4()),
            question: Set(question),
            sql_text: Set(sql_text),
            created_by: Set(created_by),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(to_domain(model))
    }

    async fn recent(&self, limit: u64) -> AppResult<Vec<QuerySample>> {
        let models = query_sample::Entity::find()
            .order_by_desc(query_sample::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<QuerySample>, u64)> {
        let paginator = query_sample::Entity::find()
            .order_by_desc(query_sample::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(to_domain).collect(), total))
    }
}
