//! Knowledge base handlers.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::{PERM_KB_MANAGE, PERM_KB_USE};
use crate::errors::{AppError, AppResult};
use crate::infra::CollectionInfo;
use crate::services::{KbAnswer, UploadReport};
use crate::types::MessageResponse;

/// Collection creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCollectionRequest {
    #[validate(length(min = 1, message = "Collection name is required"))]
    pub name: String,
}

/// Knowledge base question
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AskRequest {
    #[validate(length(min = 1, message = "Question is required"))]
    pub question: String,
    /// Number of passages to retrieve
    pub top_k: Option<usize>,
}

/// Create knowledge base routes
pub fn kb_routes() -> Router<AppState> {
    Router::new()
        .route("/collections", get(list_collections).post(create_collection))
        .route("/collections/:name", axum::routing::delete(delete_collection))
        .route("/documents", post(upload_document))
        .route("/ask", post(ask))
}

/// List vector collections
#[utoipa::path(
    get,
    path = "/api/kb/collections",
    tag = "Knowledge Base",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Collection list"),
        (status = 502, description = "Vector service unavailable")
    )
)]
pub async fn list_collections(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<CollectionInfo>>> {
    require_permission(&user, PERM_KB_MANAGE)?;

    let collections = state.services.knowledge().list_collections().await?;
    Ok(Json(collections))
}

/// Create a vector collection
#[utoipa::path(
    post,
    path = "/api/kb/collections",
    tag = "Knowledge Base",
    security(("bearer_auth" = [])),
    request_body = CreateCollectionRequest,
    responses(
        (status = 201, description = "Collection created"),
        (status = 502, description = "Vector service unavailable")
    )
)]
pub async fn create_collection(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    require_permission(&user, PERM_KB_MANAGE)?;

    state
        .services
        .knowledge()
        .create_collection(&payload.name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Collection created")),
    ))
}

/// Delete a vector collection
#[utoipa::path(
    delete,
    path = "/api/kb/collections/{name}",
    tag = "Knowledge Base",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Collection deleted"),
        (status = 502, description = "Vector service unavailable")
    )
)]
pub async fn delete_collection(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(name): Path<String>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_KB_MANAGE)?;

    state.services.knowledge().delete_collection(&name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a text document (multipart) for chunking and indexing
#[utoipa::path(
    post,
    path = "/api/kb/documents",
    tag = "Knowledge Base",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Document indexed", body = UploadReport),
        (status = 400, description = "No file in request or not valid UTF-8"),
        (status = 502, description = "Vector service unavailable")
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadReport>> {
    require_permission(&user, PERM_KB_MANAGE)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("document.txt")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.to_string()))?;
        let text = String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::validation("Document must be valid UTF-8 text"))?;

        let report = state
            .services
            .knowledge()
            .upload_document(filename, text)
            .await?;
        return Ok(Json(report));
    }

    Err(AppError::validation("Missing file field in upload"))
}

/// Ask a question against the knowledge base
#[utoipa::path(
    post,
    path = "/api/kb/ask",
    tag = "Knowledge Base",
    security(("bearer_auth" = [])),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Retrieved passages with optional synthesized answer", body = KbAnswer),
        (status = 502, description = "Vector service unavailable")
    )
)]
pub async fn ask(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AskRequest>,
) -> AppResult<Json<KbAnswer>> {
    require_permission(&user, PERM_KB_USE)?;

    let answer = state
        .services
        .knowledge()
        .ask(payload.question, payload.top_k)
        .await?;

    Ok(Json(answer))
}
