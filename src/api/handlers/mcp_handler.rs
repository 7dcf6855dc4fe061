//! MCP server registry handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MCP_MANAGE;
use crate::domain::{McpServer, McpTransport};
use crate::errors::AppResult;
use crate::infra::repositories::McpServerDraft;

/// MCP server registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ServerRequest {
    #[validate(length(min = 1, message = "Server name is required"))]
    #[schema(example = "weather-tools")]
    pub name: String,
    pub transport: McpTransport,
    /// Executable for stdio transport
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    /// Endpoint for http transport
    pub base_url: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ServerRequest {
    fn into_draft(self) -> McpServerDraft {
        McpServerDraft {
            name: self.name,
            transport: self.transport,
            command: self.command,
            args: self.args,
            env: self.env,
            base_url: self.base_url,
            headers: self.headers,
        }
    }
}

/// Create MCP registry routes
pub fn mcp_routes() -> Router<AppState> {
    Router::new()
        .route("/servers", get(list_servers).post(register_server))
        .route(
            "/servers/:id",
            get(get_server).put(update_server).delete(delete_server),
        )
        .route("/servers/:id/enable", post(enable_server))
        .route("/servers/:id/disable", post(disable_server))
        .route("/servers/:id/tools", get(list_tools))
}

/// List registered MCP servers
#[utoipa::path(
    get,
    path = "/api/mcp/servers",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Server list", body = Vec<McpServer>)
    )
)]
pub async fn list_servers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<McpServer>>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let servers = state.services.mcp().list_servers().await?;
    Ok(Json(servers))
}

/// Get a registered MCP server
#[utoipa::path(
    get,
    path = "/api/mcp/servers/{id}",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Server found", body = McpServer),
        (status = 404, description = "Server not found")
    )
)]
pub async fn get_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<McpServer>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let server = state.services.mcp().get_server(id).await?;
    Ok(Json(server))
}

/// Register an MCP server (starts disabled)
#[utoipa::path(
    post,
    path = "/api/mcp/servers",
    tag = "MCP",
    security(("bearer_auth" = [])),
    request_body = ServerRequest,
    responses(
        (status = 201, description = "Server registered", body = McpServer),
        (status = 400, description = "Transport parameters incomplete")
    )
)]
pub async fn register_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ServerRequest>,
) -> AppResult<(StatusCode, Json<McpServer>)> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let server = state
        .services
        .mcp()
        .register(payload.into_draft())
        .await?;

    Ok((StatusCode::CREATED, Json(server)))
}

/// Update an MCP server registration
#[utoipa::path(
    put,
    path = "/api/mcp/servers/{id}",
    tag = "MCP",
    security(("bearer_auth" = [])),
    request_body = ServerRequest,
    responses(
        (status = 200, description = "Server updated", body = McpServer),
        (status = 404, description = "Server not found")
    )
)]
pub async fn update_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ServerRequest>,
) -> AppResult<Json<McpServer>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let server = state
        .services
        .mcp()
        .update(id, payload.into_draft())
        .await?;

    Ok(Json(server))
}

/// Enable an MCP server for agent use
#[utoipa::path(
    post,
    path = "/api/mcp/servers/{id}/enable",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Server enabled", body = McpServer),
        (status = 404, description = "Server not found")
    )
)]
pub async fn enable_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<McpServer>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let server = state.services.mcp().set_enabled(id, true).await?;
    Ok(Json(server))
}

/// Disable an MCP server and drop its connection
#[utoipa::path(
    post,
    path = "/api/mcp/servers/{id}/disable",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Server disabled", body = McpServer),
        (status = 404, description = "Server not found")
    )
)]
pub async fn disable_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<McpServer>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let server = state.services.mcp().set_enabled(id, false).await?;
    Ok(Json(server))
}

/// Delete an MCP server registration
#[utoipa::path(
    delete,
    path = "/api/mcp/servers/{id}",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Server deleted"),
        (status = 404, description = "Server not found")
    )
)]
pub async fn delete_server(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    state.services.mcp().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List tool names exposed by a server, connecting if needed
#[utoipa::path(
    get,
    path = "/api/mcp/servers/{id}/tools",
    tag = "MCP",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tool name list"),
        (status = 502, description = "Server unreachable")
    )
)]
pub async fn list_tools(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<String>>> {
    require_permission(&user, PERM_MCP_MANAGE)?;

    let tools = state.services.mcp().list_tools(id).await?;
    Ok(Json(tools))
}
