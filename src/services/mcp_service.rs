//! MCP registry service - Server registrations and their connections.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::McpServer;
use crate::errors::{AppResult, OptionExt};
use crate::infra::repositories::{McpServerDraft, McpServerRepository};
use crate::infra::McpClientManager;

/// MCP registry service trait for dependency injection.
#[async_trait]
pub trait McpRegistryService: Send + Sync {
    async fn get_server(&self, id: Uuid) -> AppResult<McpServer>;

    async fn list_servers(&self) -> AppResult<Vec<McpServer>>;

    /// New registrations start disabled.
    async fn register(&self, draft: McpServerDraft) -> AppResult<McpServer>;

    /// Updating drops any live connection; the next use reconnects with
    /// the new parameters.
    async fn update(&self, id: Uuid, draft: McpServerDraft) -> AppResult<McpServer>;

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AppResult<McpServer>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Tool names exposed by the server, connecting if needed.
    async fn list_tools(&self, id: Uuid) -> AppResult<Vec<String>>;
}

/// Concrete implementation of McpRegistryService.
pub struct McpRegistry {
    servers: Arc<dyn McpServerRepository>,
    manager: McpClientManager,
}

impl McpRegistry {
    pub fn new(servers: Arc<dyn McpServerRepository>, manager: McpClientManager) -> Self {
        Self { servers, manager }
    }

    fn validate(draft: &McpServerDraft) -> AppResult<()> {
        use crate::domain::McpTransport;
        use crate::errors::AppError;

        match draft.transport {
            McpTransport::Stdio if draft.command.is_none() => Err(AppError::validation(
                "stdio transport requires a command",
            )),
            McpTransport::Http if draft.base_url.is_none() => {
                Err(AppError::validation("http transport requires a base URL"))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl McpRegistryService for McpRegistry {
    async fn get_server(&self, id: Uuid) -> AppResult<McpServer> {
        self.servers.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_servers(&self) -> AppResult<Vec<McpServer>> {
        self.servers.list().await
    }

    async fn register(&self, draft: McpServerDraft) -> AppResult<McpServer> {
        Self::validate(&draft)?;
        self.servers.create(draft).await
    }

    async fn update(&self, id: Uuid, draft: McpServerDraft) -> AppResult<McpServer> {
        Self::validate(&draft)?;
        let server = self.servers.update(id, draft).await?;
        self.manager.disconnect(id).await;
        Ok(server)
    }

    async fn set_enabled(&self, id: Uuid, enabled: bool) -> AppResult<McpServer> {
        let server = self.servers.set_enabled(id, enabled).await?;
        if !enabled {
            self.manager.disconnect(id).await;
        }
        Ok(server)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.servers.delete(id).await?;
        self.manager.disconnect(id).await;
        Ok(())
    }

    async fn list_tools(&self, id: Uuid) -> AppResult<Vec<String>> {
        let server = self.servers.find_by_id(id).await?.ok_or_not_found()?;
        let tools = self.manager.list_tools(&server).await?;
        Ok(tools.into_iter().map(|t| t.name.to_string()).collect())
    }
}
