//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    agent_routes, audit_routes, auth_routes, config_routes, kb_routes, mapping_routes,
    mcp_routes, permission_routes, query_routes, role_routes, schema_routes, skill_routes,
    user_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Everything except login requires a valid token
    let protected = Router::new()
        .nest("/users", user_routes())
        .nest("/roles", role_routes())
        .nest("/permissions", permission_routes())
        .nest("/query", query_routes())
        .nest("/kb", kb_routes())
        .nest("/agent", agent_routes())
        .nest("/mcp", mcp_routes())
        .nest("/skills", skill_routes())
        .nest("/mapping", mapping_routes())
        .nest("/config", config_routes())
        .nest("/audit", audit_routes())
        .nest("/schema", schema_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/auth", auth_routes())
        .nest("/api", protected)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Text2SQL Assistant"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    vector_store: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database and vector service connectivity
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.database.ping().await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    // The vector service being down degrades KB and skill search but the
    // rest of the application keeps working.
    let vector_status = if state.vector.ping().await {
        ServiceStatus {
            status: "healthy",
            error: None,
        }
    } else {
        ServiceStatus {
            status: "unhealthy",
            error: Some("heartbeat failed".to_string()),
        }
    };

    let all_healthy = db_status.status == "healthy" && vector_status.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            vector_store: vector_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
