//! Role and permission handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_USER_MANAGE;
use crate::domain::{Permission, RoleResponse};
use crate::errors::AppResult;

/// Role creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, message = "Role name is required"))]
    #[schema(example = "analyst")]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Role update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Replaces the full permission assignment when present
    pub permission_ids: Option<Vec<Uuid>>,
}

/// Create role management routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route(
            "/:id",
            get(get_role).put(update_role).delete(delete_role),
        )
}

/// Create permission catalogue routes
pub fn permission_routes() -> Router<AppState> {
    Router::new().route("/", get(list_permissions))
}

/// List roles with their permissions
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role list", body = Vec<RoleResponse>)
    )
)]
pub async fn list_roles(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<RoleResponse>>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let roles = state.services.roles().list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// Get a role by id
#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Role found", body = RoleResponse),
        (status = 404, description = "Role not found")
    )
)]
pub async fn get_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RoleResponse>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let role = state.services.roles().get_role(id).await?;
    Ok(Json(role.into()))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 409, description = "Role name already taken")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let role = state
        .services
        .roles()
        .create_role(payload.name, payload.description, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(role.into())))
}

/// Update a role and its permission assignment
#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = RoleResponse),
        (status = 400, description = "The admin role cannot be renamed"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn update_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateRoleRequest>,
) -> AppResult<Json<RoleResponse>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let role = state
        .services
        .roles()
        .update_role(
            id,
            payload.name,
            payload.description,
            payload.permission_ids,
            &user.username,
        )
        .await?;

    Ok(Json(role.into()))
}

/// Delete a role
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 400, description = "The admin role cannot be deleted"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_USER_MANAGE)?;

    state
        .services
        .roles()
        .delete_role(id, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the permission catalogue
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Permission list", body = Vec<Permission>)
    )
)]
pub async fn list_permissions(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Permission>>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let permissions = state.services.roles().list_permissions().await?;
    Ok(Json(permissions))
}
