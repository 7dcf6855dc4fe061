//! Natural-language query handlers.

use axum::{
    extract::{Query, State},
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
use crate::config::PERM_QUERY_RUN;
use crate::domain::{QueryResult, QuerySample};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams};

/// Natural-language query request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QueryRequest {
    #[validate(length(min = 1, message = "Question is required"))]
    #[schema(example = "How many orders were placed last month?")]
    pub question: String,
}

/// Create query routes
pub fn query_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(run_query))
        .route("/samples", get(list_samples))
}

/// Run a natural-language query
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "Query",
    security(("bearer_auth" = [])),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Query executed", body = QueryResult),
        (status = 400, description = "Generated SQL was rejected"),
        (status = 502, description = "LLM endpoint unavailable")
    )
)]
pub async fn run_query(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<QueryRequest>,
) -> AppResult<Json<QueryResult>> {
    require_permission(&user, PERM_QUERY_RUN)?;

    let result = state
        .services
        .query()
        .run(payload.question, &user.actor())
        .await?;

    Ok(Json(result))
}

/// List stored question/SQL samples (paginated)
#[utoipa::path(
    get,
    path = "/api/query/samples",
    tag = "Query",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated sample list")
    )
)]
pub async fn list_samples(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<QuerySample>>> {
    require_permission(&user, PERM_QUERY_RUN)?;

    let (samples, total) = state.services.query().samples(&params).await?;
    Ok(Json(Paginated::new(
        samples,
        params.page,
        params.limit(),
        total,
    )))
}
