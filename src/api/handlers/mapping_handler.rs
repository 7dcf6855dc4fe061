//! Mapping project handlers - Projects, document uploads, analysis.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_MAPPING_USE;
use crate::domain::{MappingDocument, MappingProject};
use crate::errors::{AppError, AppResult};
use crate::services::Upload;
use crate::types::{Paginated, PaginationParams};

/// Project creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Project update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Mapping analysis report
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub report: String,
}

/// Create mapping routes
pub fn mapping_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route(
            "/projects/:id/documents",
            get(list_documents).post(upload_document),
        )
        .route("/projects/:id/analyze", post(analyze))
        .route("/documents/:id", axum::routing::delete(delete_document))
        .route("/documents/:id/download", get(download_document))
}

/// List mapping projects (paginated)
#[utoipa::path(
    get,
    path = "/api/mapping/projects",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated project list")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<MappingProject>>> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let (projects, total) = state.services.mappings().list_projects(&params).await?;
    Ok(Json(Paginated::new(
        projects,
        params.page,
        params.limit(),
        total,
    )))
}

/// Get a mapping project
#[utoipa::path(
    get,
    path = "/api/mapping/projects/{id}",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Project found", body = MappingProject),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MappingProject>> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let project = state.services.mappings().get_project(id).await?;
    Ok(Json(project))
}

/// Create a mapping project
#[utoipa::path(
    post,
    path = "/api/mapping/projects",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = MappingProject)
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<MappingProject>)> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let project = state
        .services
        .mappings()
        .create_project(payload.name, payload.description, &user.actor())
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a mapping project
#[utoipa::path(
    put,
    path = "/api/mapping/projects/{id}",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = MappingProject),
        (status = 404, description = "Project not found")
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProjectRequest>,
) -> AppResult<Json<MappingProject>> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let project = state
        .services
        .mappings()
        .update_project(id, payload.name, payload.description)
        .await?;

    Ok(Json(project))
}

/// Delete a mapping project with its documents and files
#[utoipa::path(
    delete,
    path = "/api/mapping/projects/{id}",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_MAPPING_USE)?;

    state
        .services
        .mappings()
        .delete_project(id, &user.actor())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List a project's documents
#[utoipa::path(
    get,
    path = "/api/mapping/projects/{id}/documents",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Document list", body = Vec<MappingDocument>),
        (status = 404, description = "Project not found")
    )
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<MappingDocument>>> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let documents = state.services.mappings().list_documents(id).await?;
    Ok(Json(documents))
}

/// Upload a document (multipart) into a project
#[utoipa::path(
    post,
    path = "/api/mapping/projects/{id}/documents",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Document stored", body = MappingDocument),
        (status = 400, description = "No file in request"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn upload_document(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<MappingDocument>)> {
    require_permission(&user, PERM_MAPPING_USE)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.bin").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.to_string()))?;

        let document = state
            .services
            .mappings()
            .upload_document(
                id,
                Upload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                },
                &user.actor(),
            )
            .await?;

        return Ok((StatusCode::CREATED, Json(document)));
    }

    Err(AppError::validation("Missing file field in upload"))
}

/// Download a document's original content
#[utoipa::path(
    get,
    path = "/api/mapping/documents/{id}/download",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Document content"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn download_document(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let download = state.services.mappings().download_document(id).await?;

    let disposition = format!("attachment; filename=\"{}\"", download.filename);
    Ok((
        [
            (header::CONTENT_TYPE, download.content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.bytes,
    )
        .into_response())
}

/// Delete a document row and its file
#[utoipa::path(
    delete,
    path = "/api/mapping/documents/{id}",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_MAPPING_USE)?;

    state.services.mappings().delete_document(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run LLM mapping analysis across the project's documents
#[utoipa::path(
    post,
    path = "/api/mapping/projects/{id}/analyze",
    tag = "Mapping",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Analysis report", body = AnalysisResponse),
        (status = 404, description = "Project not found"),
        (status = 502, description = "LLM endpoint unavailable")
    )
)]
pub async fn analyze(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AnalysisResponse>> {
    require_permission(&user, PERM_MAPPING_USE)?;

    let report = state.services.mappings().analyze(id, &user.actor()).await?;
    Ok(Json(AnalysisResponse { report }))
}
