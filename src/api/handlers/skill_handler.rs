//! Skill library handlers.

use axum::{
    extract::{Path, Query, State},
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
use crate::config::{PERM_SKILL_MANAGE, PERM_SKILL_USE};
use crate::domain::{Skill, SkillCategory, SkillStatus};
use crate::errors::AppResult;
use crate::infra::repositories::SkillDraft;
use crate::types::{Paginated, PaginationParams};

/// Skill create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SkillRequest {
    #[validate(length(min = 1, message = "Skill name is required"))]
    #[schema(example = "join-orders-to-customers")]
    pub name: String,
    pub category: SkillCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    pub status: SkillStatus,
}

impl SkillRequest {
    fn into_draft(self) -> SkillDraft {
        SkillDraft {
            name: self.name,
            category: self.category,
            tags: self.tags,
            prerequisites: self.prerequisites,
            steps: self.steps,
            examples: self.examples,
            status: self.status,
        }
    }
}

/// Category filter for skill listings
#[derive(Debug, Deserialize)]
pub struct SkillFilter {
    pub category: Option<SkillCategory>,
}

/// Search term
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
}

/// Create skill library routes
pub fn skill_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_skills).post(create_skill))
        .route("/search", get(search_skills))
        .route(
            "/:id",
            get(get_skill).put(update_skill).delete(delete_skill),
        )
}

/// List skills (paginated, optional category filter)
#[utoipa::path(
    get,
    path = "/api/skills",
    tag = "Skills",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated skill list")
    )
)]
pub async fn list_skills(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<SkillFilter>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Skill>>> {
    require_permission(&user, PERM_SKILL_USE)?;

    let (skills, total) = state
        .services
        .skills()
        .list_skills(filter.category, &params)
        .await?;

    Ok(Json(Paginated::new(
        skills,
        params.page,
        params.limit(),
        total,
    )))
}

/// Search skills by name, tag, or semantic similarity
#[utoipa::path(
    get,
    path = "/api/skills/search",
    tag = "Skills",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Matching skills", body = Vec<Skill>)
    )
)]
pub async fn search_skills(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<Skill>>> {
    require_permission(&user, PERM_SKILL_USE)?;

    let skills = state.services.skills().search(&params.q).await?;
    Ok(Json(skills))
}

/// Get a skill by id
#[utoipa::path(
    get,
    path = "/api/skills/{id}",
    tag = "Skills",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Skill found", body = Skill),
        (status = 404, description = "Skill not found")
    )
)]
pub async fn get_skill(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Skill>> {
    require_permission(&user, PERM_SKILL_USE)?;

    let skill = state.services.skills().get_skill(id).await?;
    Ok(Json(skill))
}

/// Create a skill
#[utoipa::path(
    post,
    path = "/api/skills",
    tag = "Skills",
    security(("bearer_auth" = [])),
    request_body = SkillRequest,
    responses(
        (status = 201, description = "Skill created", body = Skill),
        (status = 409, description = "Skill name already taken")
    )
)]
pub async fn create_skill(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<SkillRequest>,
) -> AppResult<(StatusCode, Json<Skill>)> {
    require_permission(&user, PERM_SKILL_MANAGE)?;

    let skill = state
        .services
        .skills()
        .create_skill(payload.into_draft())
        .await?;

    Ok((StatusCode::CREATED, Json(skill)))
}

/// Update a skill
#[utoipa::path(
    put,
    path = "/api/skills/{id}",
    tag = "Skills",
    security(("bearer_auth" = [])),
    request_body = SkillRequest,
    responses(
        (status = 200, description = "Skill updated", body = Skill),
        (status = 404, description = "Skill not found")
    )
)]
pub async fn update_skill(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SkillRequest>,
) -> AppResult<Json<Skill>> {
    require_permission(&user, PERM_SKILL_MANAGE)?;

    let skill = state
        .services
        .skills()
        .update_skill(id, payload.into_draft())
        .await?;

    Ok(Json(skill))
}

/// Delete a skill and its vector mirror entry
#[utoipa::path(
    delete,
    path = "/api/skills/{id}",
    tag = "Skills",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Skill deleted"),
        (status = 404, description = "Skill not found")
    )
)]
pub async fn delete_skill(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    require_permission(&user, PERM_SKILL_MANAGE)?;

    state.services.skills().delete_skill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
