//! MCP server registration domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Transport used to reach an MCP server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    Stdio,
    Http,
}

impl McpTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            McpTransport::Stdio => "stdio",
            McpTransport::Http => "http",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "stdio" => Ok(McpTransport::Stdio),
            "http" => Ok(McpTransport::Http),
            other => Err(AppError::validation(format!(
                "Unknown MCP transport: {}",
                other
            ))),
        }
    }
}

/// Registered MCP server
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct McpServer {
    pub id: Uuid,
    pub name: String,
    pub transport: McpTransport,
    /// Stdio transport: command to launch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Stdio transport: command arguments
    pub args: Vec<String>,
    /// Stdio transport: extra environment variables
    pub env: HashMap<String, String>,
    /// HTTP transport: base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// HTTP transport: extra request headers
    pub headers: HashMap<String, String>,
    /// Running-state flag, persisted across restarts
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl McpServer {
    /// Validate that connection parameters match the declared transport.
    pub fn validate(&self) -> AppResult<()> {
        match self.transport {
            McpTransport::Stdio if self.command.is_none() => Err(AppError::validation(
                "stdio transport requires a command",
            )),
            McpTransport::Http if self.base_url.is_none() => {
                Err(AppError::validation("http transport requires a base URL"))
            }
            _ => Ok(()),
        }
    }
}
