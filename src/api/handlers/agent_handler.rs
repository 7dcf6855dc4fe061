//! Agent chat handler - Streams MCP-backed runs as server-sent events.

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::post,
    Extension, Router,
};
use futures::stream::Stream;
use futures::StreamExt;
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_permission, CurrentUser};
use crate::api::AppState;
use crate::config::PERM_AGENT_USE;
use crate::errors::AppResult;

/// Agent chat request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    #[schema(example = "Look up the current weather in Berlin")]
    pub message: String,
}

/// Create agent routes
pub fn agent_routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Chat with the MCP agent; the response is an SSE stream of agent
/// events ending with exactly one `is_final` event.
#[utoipa::path(
    post,
    path = "/api/agent/chat",
    tag = "Agent",
    security(("bearer_auth" = [])),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "SSE stream of agent events"),
        (status = 403, description = "Missing agent:use permission")
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<ChatRequest>,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    require_permission(&user, PERM_AGENT_USE)?;

    let rx = state
        .services
        .agent()
        .chat(payload.message, user.actor())
        .await;

    let stream = ReceiverStream::new(rx).map(|event| {
        let sse_event = Event::default()
            .json_data(&event)
            .unwrap_or_else(|_| Event::default().data("{}"));
        Ok(sse_event)
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
