//! Schema metadata repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{schema_column, schema_table};
use crate::domain::{SchemaColumn, SchemaTable};
use crate::errors::{AppError, AppResult};

/// Fields for a column definition
#[derive(Debug, Clone)]
pub struct ColumnDraft {
    pub column_name: String,
    pub data_type: String,
    pub description: String,
}

/// Schema metadata repository trait for dependency injection.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Full tree of described tables with their columns.
    async fn list_tables(&self) -> AppResult<Vec<SchemaTable>>;

    async fn find_table(&self, id: Uuid) -> AppResult<Option<SchemaTable>>;

    async fn create_table(&self, table_name: String, description: String)
        -> AppResult<SchemaTable>;

    async fn update_table(
        &self,
        id: Uuid,
        table_name: Option<String>,
        description: Option<String>,
    ) -> AppResult<SchemaTable>;

    /// Deletes the table row; columns go with it via FK cascade.
    async fn delete_table(&self, id: Uuid) -> AppResult<()>;

    async fn add_column(&self, table_id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn>;

    async fn update_column(&self, id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn>;

    async fn delete_column(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of SchemaRepository
pub struct SchemaStore {
    db: DatabaseConnection,
}

impl SchemaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn hydrate(&self, model: schema_table::Model) -> AppResult<SchemaTable> {
        let columns = model
            .find_related(schema_column::Entity)
            .order_by_asc(schema_column::Column::ColumnName)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(SchemaTable {
            id: model.id,
            table_name: model.table_name,
            description: model.description,
            columns: columns.into_iter().map(column_to_domain).collect(),
        })
    }
}

fn column_to_domain(m: schema_column::Model) -> SchemaColumn {
    SchemaColumn {
        id: m.id,
        table_id: m.table_id,
        column_name: m.column_name,
        data_type: m.data_type,
        description: m.description,
    }
}

#[async_trait]
impl SchemaRepository for SchemaStore {
    async fn list_tables(&self) -> AppResult<Vec<SchemaTable>> {
        let models = schema_table::Entity::find()
            .order_by_asc(schema_table::Column::TableName)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut tables = Vec::with_capacity(models.len());
        for m in models {
            tables.push(self.hydrate(m).await?);
        }
        Ok(tables)
    }

    async fn find_table(&self, id: Uuid) -> AppResult<Option<SchemaTable>> {
        let model = schema_table::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        match model {
            Some(m) => Ok(Some(self.hydrate(m).await?)),
            None => Ok(None),
        }
    }

    async fn create_table(
        &self,
        table_name: String,
        description: String,
    ) -> AppResult<SchemaTable> {
        let model = schema_table::ActiveModel {
            id: Set(Uuid::new_v4()),
            table_name: Set(table_name),
            description: Set(description),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        self.hydrate(model).await
    }

    async fn update_table(
        &self,
        id: Uuid,
        table_name: Option<String>,
        description: Option<String>,
    ) -> AppResult<SchemaTable> {
        let model = schema_table::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: schema_table::ActiveModel = model.into();
        if let Some(table_name) = table_name {
            active.table_name = Set(table_name);
        }
        if let Some(description) = description {
            active.description = Set(description);
        }
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        self.hydrate(model).await
    }

    async fn delete_table(&self, id: Uuid) -> AppResult<()> {
        let result = schema_table::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn add_column(&self, table_id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn> {
        // Reject orphan columns up front; SQLite reports FK failures opaquely
        schema_table::Entity::find_by_id(table_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let model = schema_column::ActiveModel {
            id: Set(Uuid::new_v4()),
            table_id: Set(table_id),
            column_name: Set(draft.column_name),
            data_type: Set(draft.data_type),
            description: Set(draft.description),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Ok(column_to_domain(model))
    }

    async fn update_column(&self, id: Uuid, draft: ColumnDraft) -> AppResult<SchemaColumn> {
        let model = schema_column::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: schema_column::ActiveModel = model.into();
        active.column_name = Set(draft.column_name);
        active.data_type = Set(draft.data_type);
        active.description = Set(draft.description);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(column_to_domain(model))
    }

    async fn delete_column(&self, id: Uuid) -> AppResult<()> {
        let result = schema_column::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
