//! Audit log handlers.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_AUDIT_VIEW;
use crate::domain::AuditLog;
use crate::errors::AppResult;
use crate::infra::repositories::AuditFilter;
use crate::types::{Paginated, PaginationParams};

/// Audit listing filters
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
}

/// Create audit routes
pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/", get(list_audit))
}

/// List audit log entries, newest first (paginated)
#[utoipa::path(
    get,
    path = "/api/audit",
    tag = "Audit",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated audit entries"),
        (status = 403, description = "Missing audit:view permission")
    )
)]
pub async fn list_audit(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<AuditQuery>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<AuditLog>>> {
    require_permission(&user, PERM_AUDIT_VIEW)?;

    let filter = AuditFilter {
        user_id: query.user_id,
        action: query.action,
    };
    let (entries, total) = state.services.audit().list(&filter, &params).await?;

    Ok(Json(Paginated::new(
        entries,
        params.page,
        params.limit(),
        total,
    )))
}
