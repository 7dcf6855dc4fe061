//! Mapping service - Projects, document uploads, and LLM mapping analysis.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::config_service::ConfigService;
use super::Actor;
use crate::domain::{MappingDocument, MappingProject, NewAuditLog};
use crate::errors::{AppResult, OptionExt};
use crate::infra::repositories::{MappingRepository, NewDocument};
use crate::infra::{ChatMessage, DocumentStorage, LlmClient};
use crate::services::AuditService;
use crate::types::PaginationParams;

/// Characters of each document sampled into the analysis prompt.
const EXCERPT_CHARS: usize = 2000;

/// An uploaded file ready for storage
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A document's content for download
#[derive(Debug)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Mapping service trait for dependency injection.
#[async_trait]
pub trait MappingService: Send + Sync {
    async fn get_project(&self, id: Uuid) -> AppResult<MappingProject>;

    async fn list_projects(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<MappingProject>, u64)>;

    async fn create_project(
        &self,
        name: String,
        description: String,
        actor: &Actor,
    ) -> AppResult<MappingProject>;

    async fn update_project(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<MappingProject>;

    /// Deletes the project, its document rows (DB cascade), and its files
    /// on disk (best effort).
    async fn delete_project(&self, id: Uuid, actor: &Actor) -> AppResult<()>;

    async fn upload_document(
        &self,
        project_id: Uuid,
        upload: Upload,
        actor: &Actor,
    ) -> AppResult<MappingDocument>;

    async fn list_documents(&self, project_id: Uuid) -> AppResult<Vec<MappingDocument>>;

    async fn download_document(&self, id: Uuid) -> AppResult<Download>;

    async fn delete_document(&self, id: Uuid) -> AppResult<()>;

    /// Ask the LLM for a field-mapping report over the project's documents.
    async fn analyze(&self, project_id: Uuid, actor: &Actor) -> AppResult<String>;
}

/// Concrete implementation of MappingService.
pub struct MappingDesk {
    mappings: Arc<dyn MappingRepository>,
    storage: DocumentStorage,
    configs: Arc<dyn ConfigService>,
    audit: Arc<dyn AuditService>,
    llm: LlmClient,
}

impl MappingDesk {
    pub fn new(
        mappings: Arc<dyn MappingRepository>,
        storage: DocumentStorage,
        configs: Arc<dyn ConfigService>,
        audit: Arc<dyn AuditService>,
        llm: LlmClient,
    ) -> Self {
        Self {
            mappings,
            storage,
            configs,
            audit,
            llm,
        }
    }
}

#[async_trait]
impl MappingService for MappingDesk {
    async fn get_project(&self, id: Uuid) -> AppResult<MappingProject> {
        self.mappings.find_project(id).await?.ok_or_not_found()
    }

    async fn list_projects(
        &self,
        params: &PaginationParams,
    ) -> AppResult<(Vec<MappingProject>, u64)> {
        self.mappings.list_projects(params).await
    }

    async fn create_project(
        &self,
        name: String,
        description: String,
        actor: &Actor,
    ) -> AppResult<MappingProject> {
        let project = self
            .mappings
            .create_project(name, description, actor.id)
            .await?;

        self.audit
            .record(
                NewAuditLog::new("mapping.project_create")
                    .user(actor.id, actor.username.clone())
                    .ip(actor.ip.clone())
                    .detail(format!("project {}", project.name)),
            )
            .await;
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<MappingProject> {
        self.mappings.update_project(id, name, description).await
    }

    async fn delete_project(&self, id: Uuid, actor: &Actor) -> AppResult<()> {
        let project = self.mappings.find_project(id).await?.ok_or_not_found()?;

        // Row delete cascades to documents; files follow best-effort
        self.mappings.delete_project(id).await?;
        self.storage.remove_project_dir(id).await;

        self.audit
            .record(
                NewAuditLog::new("mapping.project_delete")
                    .user(actor.id, actor.username.clone())
                    .ip(actor.ip.clone())
                    .detail(format!("project {}", project.name)),
            )
            .await;
        Ok(())
    }

    async fn upload_document(
        &self,
        project_id: Uuid,
        upload: Upload,
        actor: &Actor,
    ) -> AppResult<MappingDocument> {
        self.mappings
            .find_project(project_id)
            .await?
            .ok_or_not_found()?;

        let stored_path = self
            .storage
            .save(project_id, &upload.filename, &upload.bytes)
            .await?;

        let document = self
            .mappings
            .insert_document(NewDocument {
                project_id,
                filename: upload.filename,
                stored_path,
                content_type: upload.content_type,
                size_bytes: upload.bytes.len() as i64,
                uploader_id: Some(actor.id),
            })
            .await?;

        Ok(document)
    }

    async fn list_documents(&self, project_id: Uuid) -> AppResult<Vec<MappingDocument>> {
        self.mappings
            .find_project(project_id)
            .await?
            .ok_or_not_found()?;
        self.mappings.list_documents(project_id).await
    }

    async fn download_document(&self, id: Uuid) -> AppResult<Download> {
        let document = self.mappings.find_document(id).await?.ok_or_not_found()?;
        let bytes = self.storage.read(&document.stored_path).await?;

        Ok(Download {
            filename: document.filename,
            content_type: document.content_type,
            bytes,
        })
    }

    async fn delete_document(&self, id: Uuid) -> AppResult<()> {
        let document = self.mappings.find_document(id).await?.ok_or_not_found()?;
        self.mappings.delete_document(id).await?;

        if let Err(e) = self.storage.delete(&document.stored_path).await {
            tracing::warn!(document = %document.filename, error = %e,
                "failed to remove stored file");
        }
        Ok(())
    }

    async fn analyze(&self, project_id: Uuid, actor: &Actor) -> AppResult<String> {
        let project = self
            .mappings
            .find_project(project_id)
            .await?
            .ok_or_not_found()?;
        let documents = self.mappings.list_documents(project_id).await?;

        let mut prompt = format!(
            "Mapping project: {}\nDescription: {}\n\nDocuments:\n",
            project.name, project.description
        );
        for document in &documents {
            prompt.push_str(&format!("## {}\n", document.filename));
            match self.storage.read(&document.stored_path).await {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();
                    prompt.push_str(&excerpt);
                    prompt.push('\n');
                }
                Err(e) => {
                    tracing::warn!(document = %document.filename, error = %e,
                        "skipping unreadable document in analysis");
                }
            }
        }
        prompt.push_str(
            "\nProduce a field-mapping report: for each source field, the matching \
             target field, the transformation needed, and any fields with no match.",
        );

        let settings = self.configs.llm_settings().await?;
        let messages = [
            ChatMessage::system("You are a data-mapping analyst."),
            ChatMessage::user(prompt),
        ];
        let report = self.llm.complete(&settings, &messages).await?;

        self.audit
            .record(
                NewAuditLog::new("mapping.analyze")
                    .user(actor.id, actor.username.clone())
                    .ip(actor.ip.clone())
                    .detail(format!("project {}", project.name)),
            )
            .await;
        Ok(report)
    }
}
