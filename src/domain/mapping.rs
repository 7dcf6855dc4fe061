//! Mapping project and document domain entities.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Mapping analysis project
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MappingProject {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Null when the owning user has been deleted
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Uploaded document belonging to a project
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MappingDocument {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// Path on disk relative to the upload root
    #[serde(skip_serializing)]
    pub stored_path: String,
    pub content_type: String,
    pub size_bytes: i64,
    /// Null when the uploading user has been deleted
    pub uploader_id: Option<Uuid>,
    pub uploaded_at: DateTime<Utc>,
}
