//! Runtime configuration handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_CONFIG_MANAGE;
use crate::domain::{ConfigEntryResponse, NewAuditLog, ValueType};
use crate::errors::AppResult;
use crate::services::ConfigUpsert;

/// Configuration upsert request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertConfigRequest {
    #[validate(length(min = 1, message = "Key is required"))]
    #[schema(example = "llm.endpoint")]
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sensitive: bool,
    #[serde(default)]
    pub description: String,
}

/// Create configuration routes
pub fn config_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_config).put(upsert_config))
        .route("/:key", get(get_config).delete(delete_config))
}

/// List configuration entries (sensitive values masked)
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "Configuration",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Configuration entries", body = Vec<ConfigEntryResponse>)
    )
)]
pub async fn list_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ConfigEntryResponse>>> {
    require_permission(&user, PERM_CONFIG_MANAGE)?;

    let entries = state.services.configs().list().await?;
    Ok(Json(entries))
}

/// Get one configuration entry
#[utoipa::path(
    get,
    path = "/api/config/{key}",
    tag = "Configuration",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entry found", body = ConfigEntryResponse),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn get_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<Json<ConfigEntryResponse>> {
    require_permission(&user, PERM_CONFIG_MANAGE)?;

    let entry = state.services.configs().get(&key).await?;
    Ok(Json(entry))
}

/// Create or update a configuration entry
#[utoipa::path(
    put,
    path = "/api/config",
    tag = "Configuration",
    security(("bearer_auth" = [])),
    request_body = UpsertConfigRequest,
    responses(
        (status = 200, description = "Entry upserted", body = ConfigEntryResponse),
        (status = 400, description = "Value does not parse under the declared type")
    )
)]
pub async fn upsert_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpsertConfigRequest>,
) -> AppResult<Json<ConfigEntryResponse>> {
    require_permission(&user, PERM_CONFIG_MANAGE)?;

    let key = payload.key.clone();
    let entry = state
        .services
        .configs()
        .upsert(ConfigUpsert {
            key: payload.key,
            value: payload.value,
            value_type: payload.value_type,
            category: payload.category,
            sensitive: payload.sensitive,
            description: payload.description,
        })
        .await?;

    let actor = user.actor();
    state
        .services
        .audit()
        .record(
            NewAuditLog::new("config.upsert")
                .user(actor.id, actor.username)
                .ip(actor.ip)
                .detail(format!("key {}", key)),
        )
        .await;

    Ok(Json(entry))
}

/// Delete a configuration entry
#[utoipa::path(
    delete,
    path = "/api/config/{key}",
    tag = "Configuration",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn delete_config(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_CONFIG_MANAGE)?;

    state.services.configs().delete(&key).await?;

    let actor = user.actor();
    state
        .services
        .audit()
        .record(
            NewAuditLog::new("config.delete")
                .user(actor.id, actor.username)
                .ip(actor.ip)
                .detail(format!("key {}", key)),
        )
        .await;

    Ok(StatusCode::NO_CONTENT)
}
