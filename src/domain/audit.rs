//! Audit log domain entity.
//!
//! Audit records are append-only: the domain type has no mutators and the
//! repository exposes insert and list operations only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A single audit record
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditLog {
    pub id: i64,
    /// Null when the acting user has since been deleted
    pub user_id: Option<Uuid>,
    /// Username snapshot at the time of the action
    pub username: String,
    #[schema(example = "query.run")]
    pub action: String,
    pub ip: String,
    /// Free-form detail (request summary, error text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Generated SQL, for query actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_text: Option<String>,
    /// Short response summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_summary: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Data for a new audit record
#[derive(Debug, Clone, Default)]
pub struct NewAuditLog {
    pub user_id: Option<Uuid>,
    pub username: String,
    pub action: String,
    pub ip: String,
    pub detail: Option<String>,
    pub sql_text: Option<String>,
    pub response_summary: Option<String>,
}

impl NewAuditLog {
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            ..Default::default()
        }
    }

    pub fn user(mut self, id: Uuid, username: impl Into<String>) -> Self {
        self.user_id = Some(id);
        self.username = username.into();
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn sql(mut self, sql: impl Into<String>) -> Self {
        self.sql_text = Some(sql.into());
        self
    }

    pub fn response(mut self, summary: impl Into<String>) -> Self {
        self.response_summary = Some(summary.into());
        self
    }
}
