//! Schema metadata handlers.
//!
//! The metadata edited here feeds the prompt the query pipeline builds;
//! it describes the target database, not this application's own schema.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::{PERM_QUERY_RUN, PERM_SCHEMA_MANAGE};
use crate::domain::{SchemaColumn, SchemaTable};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::ColumnDraft;

/// Table creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTableRequest {
    #[validate(length(min = 1, message = "Table name is required"))]
    #[schema(example = "orders")]
    pub table_name: String,
    #[serde(default)]
    pub description: String,
}

/// Table update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTableRequest {
    pub table_name: Option<String>,
    pub description: Option<String>,
}

/// Column create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ColumnRequest {
    #[validate(length(min = 1, message = "Column name is required"))]
    #[schema(example = "order_date")]
    pub column_name: String,
    #[schema(example = "DATE")]
    pub data_type: String,
    #[serde(default)]
    pub description: String,
}

impl ColumnRequest {
    fn into_draft(self) -> ColumnDraft {
        ColumnDraft {
            column_name: self.column_name,
            data_type: self.data_type,
            description: self.description,
        }
    }
}

/// Readers need either the edit permission or the query permission,
/// since the tree backs the query UI.
fn require_read(user: &CurrentUser) -> Result<(), AppError> {
    if user.can(PERM_SCHEMA_MANAGE) || user.can(PERM_QUERY_RUN) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Create schema metadata routes
pub fn schema_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(schema_tree))
        .route("/tables", post(create_table))
        .route(
            "/tables/:id",
            get(get_table).put(update_table).delete(delete_table),
        )
        .route("/tables/:id/columns", post(add_column))
        .route(
            "/columns/:id",
            put(update_column).delete(delete_column),
        )
}

/// Full schema tree: tables with their columns
#[utoipa::path(
    get,
    path = "/api/schema",
    tag = "Schema",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Schema tree", body = Vec<SchemaTable>)
    )
)]
pub async fn schema_tree(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<SchemaTable>>> {
    require_read(&user)?;

    let tables = state.services.schema().tree().await?;
    Ok(Json(tables))
}

/// Get one table with its columns
#[utoipa::path(
    get,
    path = "/api/schema/tables/{id}",
    tag = "Schema",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Table found", body = SchemaTable),
        (status = 404, description = "Table not found")
    )
)]
pub async fn get_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SchemaTable>> {
    require_read(&user)?;

    let table = state.services.schema().get_table(id).await?;
    Ok(Json(table))
}

/// Create a table entry
#[utoipa::path(
    post,
    path = "/api/schema/tables",
    tag = "Schema",
    security(("bearer_auth" = [])),
    request_body = CreateTableRequest,
    responses(
        (status = 201, description = "Table created", body = SchemaTable)
    )
)]
pub async fn create_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTableRequest>,
) -> AppResult<(StatusCode, Json<SchemaTable>)> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    let table = state
        .services
        .schema()
        .create_table(payload.table_name, payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(table)))
}

/// Update a table entry
#[utoipa::path(
    put,
    path = "/api/schema/tables/{id}",
    tag = "Schema",
    security(("bearer_auth" = [])),
    request_body = UpdateTableRequest,
    responses(
        (status = 200, description = "Table updated", body = SchemaTable),
        (status = 404, description = "Table not found")
    )
)]
pub async fn update_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTableRequest>,
) -> AppResult<Json<SchemaTable>> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    let table = state
        .services
        .schema()
        .update_table(id, payload.table_name, payload.description)
        .await?;

    Ok(Json(table))
}

/// Delete a table entry and its columns
#[utoipa::path(
    delete,
    path = "/api/schema/tables/{id}",
    tag = "Schema",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Table deleted"),
        (status = 404, description = "Table not found")
    )
)]
pub async fn delete_table(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    state.services.schema().delete_table(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add a column to a table
#[utoipa::path(
    post,
    path = "/api/schema/tables/{id}/columns",
    tag = "Schema",
    security(("bearer_auth" = [])),
    request_body = ColumnRequest,
    responses(
        (status = 201, description = "Column added", body = SchemaColumn),
        (status = 404, description = "Table not found")
    )
)]
pub async fn add_column(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ColumnRequest>,
) -> AppResult<(StatusCode, Json<SchemaColumn>)> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    let column = state
        .services
        .schema()
        .add_column(id, payload.into_draft())
        .await?;

    Ok((StatusCode::CREATED, Json(column)))
}

/// Update a column
#[utoipa::path(
    put,
    path = "/api/schema/columns/{id}",
    tag = "Schema",
    security(("bearer_auth" = [])),
    request_body = ColumnRequest,
    responses(
        (status = 200, description = "Column updated", body = SchemaColumn),
        (status = 404, description = "Column not found")
    )
)]
pub async fn update_column(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ColumnRequest>,
) -> AppResult<Json<SchemaColumn>> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    let column = state
        .services
        .schema()
        .update_column(id, payload.into_draft())
        .await?;

    Ok(Json(column))
}

/// Delete a column
#[utoipa::path(
    delete,
    path = "/api/schema/columns/{id}",
    tag = "Schema",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Column deleted"),
        (status = 404, description = "Column not found")
    )
)]
pub async fn delete_column(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_SCHEMA_MANAGE)?;

    state.services.schema().delete_column(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
