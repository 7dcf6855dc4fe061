//! Mapping project and document repository.
//!
//! Document rows cascade from their project at the database level;
//! uploader references are set-null when the user is deleted.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{mapping_document, mapping_project};
use crate::domain::{MappingDocument, MappingProject};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data for a new document row
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub project_id: Uuid,
    pub filename: String,
    pub stored_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub uploader_id: Option<Uuid>,
}

/// Mapping repository trait for dependency injection.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    async fn find_project(&self, id: Uuid) -> AppResult<Option<MappingProject>>;

    async fn list_projects(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<MappingProject>, u64)>;

    async fn create_project(
        &self,
        name: String,
        description: String,
        owner_id: Uuid,
    ) -> AppResult<MappingProject>;

    async fn update_project(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<MappingProject>;

    /// Deletes the project row; document rows go with it via FK cascade.
    async fn delete_project(&self, id: Uuid) -> AppResult<()>;

    async fn insert_document(&self, doc: NewDocument) -> AppResult<MappingDocument>;

    async fn find_document(&self, id: Uuid) -> AppResult<Option<MappingDocument>>;

    async fn list_documents(&self, project_id: Uuid) -> AppResult<Vec<MappingDocument>>;

    async fn delete_document(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of MappingRepository
pub struct MappingStore {
    db: DatabaseConnection,
}

impl MappingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn project_to_domain(m: mapping_project::Model) -> MappingProject {
    MappingProject {
        id: m.id,
        name: m.name,
        description: m.description,
        owner_id: m.owner_id,
        created_at: m.created_at,
    }
}

fn document_to_domain(m: mapping_document::Model) -> MappingDocument {
    MappingDocument {
        id: m.id,
        project_id: m.project_id,
        filename: m.filename,
        stored_path: m.stored_path,
        content_type: m.content_type,
        size_bytes: m.size_bytes,
        uploader_id: m.uploader_id,
        uploaded_at: m.uploaded_at,
    }
}

#[async_trait]
impl MappingRepository for MappingStore {
    async fn find_project(&self, id: Uuid) -> AppResult<Option<MappingProject>> {
        let model = mapping_project::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(model.map(project_to_domain))
    }

    async fn list_projects(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<MappingProject>, u64)> {
        let paginator = mapping_project::Entity::find()
            .order_by_desc(mapping_project::Column::CreatedAt)
            .paginate(&self.db, params.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(project_to_domain).collect(), total))
    }

    async fn create_project(
        &self,
        name: String,
        description: String,
        owner_id: Uuid,
    ) -> AppResult<MappingProject> {
        let model = mapping_project::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            owner_id: Set(Some(owner_id)),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(project_to_domain(model))
    }

    async fn update_project(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<MappingProject> {
        let model = mapping_project::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: mapping_project::ActiveModel = model.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(project_to_domain(model))
    }

    async fn delete_project(&self, id: Uuid) -> AppResult<()> {
        let result = mapping_project::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn insert_document(&self, doc: NewDocument) -> AppResult<MappingDocument> {
        let model = mapping_document::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(doc.project_id),
            filename: Set(doc.filename),
            stored_path: Set(doc.stored_path),
            content_type: Set(doc.content_type),
            size_bytes: Set(doc.size_bytes),
            uploader_id: Set(doc.uploader_id),
            uploaded_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(document_to_domain(model))
    }

    async fn find_document(&self, id: Uuid) -> AppResult<Option<MappingDocument>> {
        let model = mapping_document::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(model.map(document_to_domain))
    }

    async fn list_documents(&self, project_id: Uuid) -> AppResult<Vec<MappingDocument>> {
        let models = mapping_document::Entity::find()
            .filter(mapping_document::Column::ProjectId.eq(project_id))
            .order_by_desc(mapping_document::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(document_to_domain).collect())
    }

    async fn delete_document(&self, id: Uuid) -> AppResult<()> {
        let result = mapping_document::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
