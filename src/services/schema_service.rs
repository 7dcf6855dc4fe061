//! Schema metadata service.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{SchemaColumn, SchemaTable};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{ColumnDraft, SchemaRepository};

/// Schema metadata service trait for dependency injection.
#[async_trait]
pub trait SchemaService: Send + Sync {
    /// Full tree: tables with their columns.
    async fn tree(&self) -> AppResult<Vec<SchemaTable>>;

    async fn get_table(&self, id: Uuid) -> AppResult<SchemaTable>;

    async fn create_table(&self, table_name: String, description: String)
        -> AppResult<SchemaTable>;

    async fn update_table(
        &self,
        id: Uuid,
        table_name: Option<String>,
        description: Option<String>,
    ) -> AppResult<SchemaTable>;

    async fn delete_table(&self, id: Uuid) -> AppResult<()>;

    async fn add_column(&self, table_id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn>;

    async fn update_column(&self, id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn>;

    async fn delete_column(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of SchemaService.
pub struct SchemaCatalogue {
    schema: Arc<dyn SchemaRepository>,
}

impl SchemaCatalogue {
    pub fn new(schema: Arc<dyn SchemaRepository>) -> Self {
        Self { schema }
    }
}

#[async_trait]
impl SchemaService for SchemaCatalogue {
    async fn tree(&self) -> AppResult<Vec<SchemaTable>> {
        self.schema.list_tables().await
    }

    async fn get_table(&self, id: Uuid) -> AppResult<SchemaTable> {
        self.schema.find_table(id).await?.ok_or_not_found()
    }

    async fn create_table(
        &self,
        table_name: String,
        description: String,
    ) -> AppResult<SchemaTable> {
        if table_name.trim().is_empty() {
            return Err(AppError::validation("table_name must not be empty"));
        }
        self.schema.create_table(table_name, description).await
    }

    async fn update_table(
        &self,
        id: Uuid,
        table_name: Option<String>,
        description: Option<String>,
    ) -> AppResult<SchemaTable> {
        self.schema.update_table(id, table_name, description).await
    }

    async fn delete_table(&self, id: Uuid) -> AppResult<()> {
        self.schema.delete_table(id).await
    }

    async fn add_column(&self, table_id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn> {
        self.schema.add_column(table_id, draft).await
    }

    async fn update_column(&self, id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn> {
        self.schema.update_column(id, draft).await
    }

    async fn delete_column(&self, id: Uuid) -> AppResult<()> {
        self.schema.delete_column(id).await
    }
}
