//! OpenAI-compatible chat completion client.
//!
//! Endpoint, model and API key come from runtime configuration rows, so a
//! single client instance serves whatever backend is currently configured.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::{AppError, AppResult};

/// Resolved connection settings for one completion call.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

/// One message in a chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Sends a chat completion request and returns the assistant text.
    pub async fn complete(
        &self,
        settings: &LlmSettings,
        messages: &[ChatMessage],
    ) -> AppResult<String> {
        let url = format!(
            "{}/chat/completions",
            settings.endpoint.trim_end_matches('/')
        );
        let body = json!({
            "model": settings.model,
            "messages": messages,
            "temperature": 0.0,
        });

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &settings.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "completion request failed");
            AppError::upstream("language model")
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, detail, "completion request rejected");
            return Err(AppError::upstream("language model"));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "completion response unreadable");
            AppError::upstream("language model")
        })?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::upstream("language model"))
    }
}

impl Default for LlmClient {
    fn default() -> Self {
        Self::new()
    }
}
