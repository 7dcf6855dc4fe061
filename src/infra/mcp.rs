//! MCP client connection manager.
//!
//! Connections are established lazily on first use and cached per server
//! id. Disable or delete drops the cached connection; a later request
//! reconnects from the stored registration.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParam, CallToolResult, ClientInfo, Implementation, Tool,
};
use rmcp::service::{RoleClient, RunningService, ServiceExt};
use rmcp::transport::streamable_http_client::{
    StreamableHttpClientTransport, StreamableHttpClientTransportConfig,
};
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{McpServer, McpTransport};
use crate::errors::{AppError, AppResult};

type McpService = RunningService<RoleClient, ClientInfo>;

#[derive(Clone, Default)]
pub struct McpClientManager {
    connections: Arc<RwLock<HashMap<Uuid, Arc<McpService>>>>,
}

impl McpClientManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn client_info() -> ClientInfo {
        ClientInfo {
            protocol_version: Default::default(),
            capabilities: Default::default(),
            client_info: Implementation::from_build_env(),
        }
    }

    async fn connect_stdio(server: &McpServer) -> AppResult<McpService> {
        let program = server
            .command
            .as_deref()
            .ok_or_else(|| AppError::validation("stdio server has no command"))?;

        let mut command = Command::new(program);
        command
            .args(&server.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in &server.env {
            command.env(key, value);
        }

        let transport = TokioChildProcess::new(command).map_err(|e| {
            tracing::warn!(server = %server.name, error = %e, "failed to spawn MCP process");
            AppError::upstream("MCP server")
        })?;

        Self::client_info().serve(transport).await.map_err(|e| {
            tracing::warn!(server = %server.name, error = %e, "MCP handshake failed");
            AppError::upstream("MCP server")
        })
    }

    async fn connect_http(server: &McpServer) -> AppResult<McpService> {
        let base_url = server
            .base_url
            .as_deref()
            .ok_or_else(|| AppError::validation("http server has no base_url"))?;

        let mut headers = reqwest::header::HeaderMap::new();
        for (key, value) in &server.headers {
            let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| AppError::validation(format!("invalid header name: {}", key)))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|_| AppError::validation(format!("invalid header value for {}", key)))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                tracing::warn!(server = %server.name, error = %e, "failed to build HTTP client");
                AppError::upstream("MCP server")
            })?;

        let transport = StreamableHttpClientTransport::with_client(
            http,
            StreamableHttpClientTransportConfig::with_uri(base_url.to_string()),
        );

        Self::client_info().serve(transport).await.map_err(|e| {
            tracing::warn!(server = %server.name, error = %e, "MCP handshake failed");
            AppError::upstream("MCP server")
        })
    }

    /// Returns the cached connection for this server, connecting if needed.
    async fn connection(&self, server: &McpServer) -> AppResult<Arc<McpService>> {
        if let Some(service) = self.connections.read().await.get(&server.id) {
            return Ok(service.clone());
        }

        tracing::info!(server = %server.name, transport = %server.transport.as_str(),
            "connecting to MCP server");

        let service = match server.transport {
            McpTransport::Stdio => Self::connect_stdio(server).await?,
            McpTransport::Http => Self::connect_http(server).await?,
        };
        let service = Arc::new(service);

        self.connections
            .write()
            .await
            .insert(server.id, service.clone());
        Ok(service)
    }

    pub async fn list_tools(&self, server: &McpServer) -> AppResult<Vec<Tool>> {
        let service = self.connection(server).await?;
        let result = service.list_tools(Default::default()).await.map_err(|e| {
            tracing::warn!(server = %server.name, error = %e, "list_tools failed");
            AppError::upstream("MCP server")
        })?;
        Ok(result.tools)
    }

    pub async fn call_tool(
        &self,
        server: &McpServer,
        tool: &str,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> AppResult<CallToolResult> {
        let service = self.connection(server).await?;
        service
            .call_tool(CallToolRequestParam {
                name: tool.to_string().into(),
                arguments,
            })
            .await
            .map_err(|e| {
                tracing::warn!(server = %server.name, tool, error = %e, "tool call failed");
                AppError::upstream("MCP server")
            })
    }

    /// Drops the cached connection; cancels the session when we hold the
    /// last reference.
    pub async fn disconnect(&self, server_id: Uuid) {
        let removed = self.connections.write().await.remove(&server_id);
        if let Some(service) = removed {
            match Arc::try_unwrap(service) {
                Ok(service) => {
                    if let Err(e) = service.cancel().await {
                        tracing::warn!(%server_id, error = %e, "failed to cancel MCP session");
                    }
                }
                Err(_) => {
                    tracing::debug!(%server_id, "MCP session still in use, dropping handle");
                }
            }
        }
    }

    pub async fn is_connected(&self, server_id: Uuid) -> bool {
        self.connections.read().await.contains_key(&server_id)
    }
}
