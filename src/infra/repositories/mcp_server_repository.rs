//! MCP server registration repository.
//!
//! The `enabled` flag is the persisted running-state: it survives restarts
//! and decides which servers agent mode may select.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::entities::mcp_server;
use crate::domain::{McpServer, McpTransport};
use crate::errors::{AppError, AppResult};

/// Fields for registering or updating an MCP server
#[derive(Debug, Clone)]
pub struct McpServerDraft {
    pub name: String,
    pub transport: McpTransport,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub env: HashMap<String, String>,
    pub base_url: Option<String>,
    pub headers: HashMap<String, String>,
}

/// MCP server repository trait for dependency injection.
#[async_trait]
pub trait McpServerRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<McpServer>>;

    async fn list(&self) -> AppResult<Vec<McpServer>>;

    async fn list_enabled(&self) -> AppResult<Vec<McpServer>>;

    async fn create(&self, draft: McpServerDraft) -> AppResult<McpServer>;

    async fn update(&self, id: Uuid, draft: McpServerDraft) -> AppResult<McpServer>;

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AppResult<McpServer>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of McpServerRepository
pub struct McpServerStore {
    db: DatabaseConnection,
}

impl McpServerStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn decode_map(raw: &str) -> HashMap<String, String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn to_domain(m: mcp_server::Model) -> AppResult<McpServer> {
    Ok(McpServer {
        id: m.id,
        name: m.name,
        transport: McpTransport::parse(&m.transport)?,
        command: m.command,
        args: serde_json::from_str(&m.args).unwrap_or_default(),
        env: decode_map(&m.env),
        base_url: m.base_url,
        headers: decode_map(&m.headers),
        enabled: m.enabled,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn apply_draft(active: &mut mcp_server::ActiveModel, draft: McpServerDraft) {
    active.name = Set(draft.name);
    active.transport = Set(draft.transport.as_str().to_string());
    active.command = Set(draft.command);
    active.args = Set(serde_json::to_string(&draft.args).unwrap_or_else(|_| "[]".into()));
    active.env = Set(serde_json::to_string(&draft.env).unwrap_or_else(|_| "{}".into()));
    active.base_url = Set(draft.base_url);
    active.headers = Set(serde_json::to_string(&draft.headers).unwrap_or_else(|_| "{}".into()));
    active.updated_at = Set(Utc::now());
}

#[async_trait]
impl McpServerRepository for McpServerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<McpServer>> {
        let model = mcp_server::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        model.map(to_domain).transpose()
    }

    async fn list(&self) -> AppResult<Vec<McpServer>> {
        let models = mcp_server::Entity::find()
            .order_by_asc(mcp_server::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        models.into_iter().map(to_domain).collect()
    }

    async fn list_enabled(&self) -> AppResult<Vec<McpServer>> {
        let models = mcp_server::Entity::find()
            .filter(mcp_server::Column::Enabled.eq(true))
            .order_by_asc(mcp_server::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        models.into_iter().map(to_domain).collect()
    }

    async fn create(&self, draft: McpServerDraft) -> AppResult<McpServer> {
        let now = Utc::now();
        let mut active = mcp_server::ActiveModel {
            id: Set(Uuid::new_v4()),
            enabled: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_draft(&mut active, draft);

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        to_domain(model)
    }

    async fn update(&self, id: Uuid, draft: McpServerDraft) -> AppResult<McpServer> {
        let model = mcp_server::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: mcp_server::ActiveModel = model.into();
        apply_draft(&mut active, draft);

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        to_domain(model)
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AppResult<McpServer> {
        let model = mcp_server::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let mut active: mcp_server::ActiveModel = model.into();
        active.enabled = Set(enabled);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = mcp_server::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
