//! Query feature domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Cached question -> SQL pair, replayed into prompts as a few-shot example
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuerySample {
    pub id: Uuid,
    pub question: String,
    pub sql_text: String,
    /// Null when the creating user has been deleted
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Result of executing a generated SQL query
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QueryResult {
    /// The SQL that was executed
    pub sql: String,
    pub columns: Vec<String>,
    /// Row values serialized as JSON
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Whether the row cap was hit
    pub truncated: bool,
    /// Explanation text from the LLM, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}
