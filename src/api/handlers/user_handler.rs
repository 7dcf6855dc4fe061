//! User administration handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
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
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::{NewUser, UserUpdate};
use crate::types::{MessageResponse, Paginated, PaginationParams};

/// User creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(min_length = 8)]
    pub password: String,
    /// Roles assigned at creation
    #[serde(default)]
    pub role_ids: Vec<Uuid>,
}

/// User update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub active: Option<bool>,
    pub role_ids: Option<Vec<Uuid>>,
}

/// Password reset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_current_user))
        .route(
            "/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/:id/password", put(reset_password))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let profile = state.services.users().get_user(user.id).await?;
    Ok(Json(profile.into()))
}

/// List users (paginated)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated user list"),
        (status = 403, description = "Missing user:manage permission")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let (users, total) = state.services.users().list_users(&params).await?;
    let data = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Paginated::new(data, params.page, params.limit(), total)))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let found = state.services.users().get_user(id).await?;
    Ok(Json(found.into()))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let created = state
        .services
        .users()
        .create_user(
            NewUser {
                username: payload.username,
                email: payload.email,
                password: payload.password,
                role_ids: payload.role_ids,
            },
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    let updated = state
        .services
        .users()
        .update_user(
            id,
            UserUpdate {
                email: payload.email,
                active: payload.active,
                role_ids: payload.role_ids,
            },
            &user.username,
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Reset a user's password
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 404, description = "User not found")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_permission(&user, PERM_USER_MANAGE)?;

    state
        .services
        .users()
        .reset_password(id, payload.password, &user.username)
        .await?;

    Ok(Json(MessageResponse::new("Password reset")))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_USER_MANAGE)?;

    state
        .services
        .users()
        .delete_user(id, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
