//! Agent service - MCP-backed chat, streamed as server-sent events.
//!
//! The generator picks an enabled MCP server for the message, asks the
//! LLM whether a tool call is needed, runs it, and streams progress as it
//! goes. Every stream ends with exactly one `is_final: true` event,
//! whether the run succeeded or died on the way.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc;
use utoipa::ToSchema;

use super::config_service::ConfigService;
use super::Actor;
use crate::domain::{McpServer, NewAuditLog};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::McpServerRepository;
use crate::infra::{ChatMessage, LlmClient, McpClientManager};
use crate::services::AuditService;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Kind of streamed agent event
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AgentEventType {
    Status,
    ToolCall,
    ToolResult,
    Answer,
    Error,
}

/// One event in an agent chat stream
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AgentEvent {
    #[serde(rename = "type")]
    pub event_type: AgentEventType,
    pub content: String,
    pub is_final: bool,
    /// Structured payload (tool result, model output) when available
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub llm_result: Option<serde_json::Value>,
}

impl AgentEvent {
    fn status(content: impl Into<String>) -> Self {
        Self {
            event_type: AgentEventType::Status,
            content: content.into(),
            is_final: false,
            llm_result: None,
        }
    }

    fn tool_call(content: impl Into<String>) -> Self {
        Self {
            event_type: AgentEventType::ToolCall,
            content: content.into(),
            is_final: false,
            llm_result: None,
        }
    }

    fn tool_result(content: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Self {
            event_type: AgentEventType::ToolResult,
            content: content.into(),
            is_final: false,
            llm_result: payload,
        }
    }

    fn answer(content: impl Into<String>, payload: Option<serde_json::Value>) -> Self {
        Self {
            event_type: AgentEventType::Answer,
            content: content.into(),
            is_final: true,
            llm_result: payload,
        }
    }

    fn error(content: impl Into<String>) -> Self {
        Self {
            event_type: AgentEventType::Error,
            content: content.into(),
            is_final: true,
            llm_result: None,
        }
    }
}

/// Agent service trait for dependency injection.
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Start a chat run; events arrive on the returned receiver. Dropping
    /// the receiver (client disconnect) ends the run.
    async fn chat(&self, message: String, actor: Actor) -> mpsc::Receiver<AgentEvent>;
}

/// Concrete implementation of AgentService.
pub struct AgentOrchestrator {
    servers: Arc<dyn McpServerRepository>,
    manager: McpClientManager,
    configs: Arc<dyn ConfigService>,
    audit: Arc<dyn AuditService>,
    llm: LlmClient,
}

impl AgentOrchestrator {
    pub fn new(
        servers: Arc<dyn McpServerRepository>,
        manager: McpClientManager,
        configs: Arc<dyn ConfigService>,
        audit: Arc<dyn AuditService>,
        llm: LlmClient,
    ) -> Self {
        Self {
            servers,
            manager,
            configs,
            audit,
            llm,
        }
    }

    /// Pick the server whose name or tool names appear in the message;
    /// first match wins, fallback to the first enabled server.
    async fn select_server(&self, message: &str, enabled: Vec<McpServer>) -> Option<McpServer> {
        if let Some(index) = match_server_name(message, &enabled) {
            return Some(enabled[index].clone());
        }

        let lowered = message.to_lowercase();
        for server in &enabled {
            match self.manager.list_tools(server).await {
                Ok(tools) => {
                    if tools
                        .iter()
                        .any(|t| lowered.contains(&t.name.to_lowercase()))
                    {
                        return Some(server.clone());
                    }
                }
                Err(e) => {
                    tracing::warn!(server = %server.name, error = %e,
                        "skipping unreachable server during selection");
                }
            }
        }

        enabled.into_iter().next()
    }

    async fn run(
        &self,
        message: &str,
        tx: &mpsc::Sender<AgentEvent>,
    ) -> AppResult<(String, Option<serde_json::Value>)> {
        let settings = self.configs.llm_settings().await?;

        let _ = tx.send(AgentEvent::status("Selecting MCP server")).await;
        let enabled = self.servers.list_enabled().await?;
        let server = self
            .select_server(message, enabled)
            .await
            .ok_or_else(|| AppError::validation("No MCP server is enabled"))?;

        let _ = tx
            .send(AgentEvent::status(format!("Using server {}", server.name)))
            .await;
        let tools = self.manager.list_tools(&server).await?;

        let mut catalogue = String::new();
        for tool in &tools {
            catalogue.push_str(&format!(
                "- {}: {}\n",
                tool.name,
                tool.description.as_deref().unwrap_or("")
            ));
        }

        let decision_prompt = format!(
            "Available tools:\n{}\nUser message: {}\n\n\
             Respond with JSON only. To call a tool: \
             {{\"tool\": \"<name>\", \"arguments\": {{...}}}}. \
             To answer directly: {{\"answer\": \"<text>\"}}.",
            catalogue, message
        );
        let decision = self
            .llm
            .complete(
                &settings,
                &[
                    ChatMessage::system("You route user requests to MCP tools."),
                    ChatMessage::user(decision_prompt),
                ],
            )
            .await?;

        let decision: serde_json::Value = serde_json::from_str(strip_fences(&decision))
            .map_err(|_| AppError::upstream("language model"))?;

        if let Some(answer) = decision.get("answer").and_then(|a| a.as_str()) {
            return Ok((answer.to_string(), None));
        }

        let tool_name = decision
            .get("tool")
            .and_then(|t| t.as_str())
            .ok_or_else(|| AppError::upstream("language model"))?;
        let arguments = decision
            .get("arguments")
            .and_then(|a| a.as_object())
            .cloned();

        let _ = tx
            .send(AgentEvent::tool_call(format!("Calling {}", tool_name)))
            .await;
        let result = self.manager.call_tool(&server, tool_name, arguments).await?;
        let result_json = serde_json::to_value(&result).ok();

        let result_text = result
            .content
            .iter()
            .filter_map(|c| c.as_text().map(|t| t.text.clone()))
            .collect::<Vec<_>>()
            .join("\n");
        let _ = tx
            .send(AgentEvent::tool_result(
                result_text.clone(),
                result_json.clone(),
            ))
            .await;

        let summary_prompt = format!(
            "User message: {}\n\nTool {} returned:\n{}\n\nAnswer the user.",
            message, tool_name, result_text
        );
        let answer = self
            .llm
            .complete(
                &settings,
                &[
                    ChatMessage::system("Summarize tool output for the user."),
                    ChatMessage::user(summary_prompt),
                ],
            )
            .await?;

        Ok((answer, result_json))
    }
}

/// Index of the first server whose name appears in the message,
/// case-insensitive.
fn match_server_name(message: &str, servers: &[McpServer]) -> Option<usize> {
    let lowered = message.to_lowercase();
    servers
        .iter()
        .position(|s| lowered.contains(&s.name.to_lowercase()))
}

/// Strip a markdown code fence wrapping a JSON payload.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim().trim_end_matches("```").trim()
}

#[async_trait]
impl AgentService for AgentOrchestrator {
    async fn chat(&self, message: String, actor: Actor) -> mpsc::Receiver<AgentEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let orchestrator = Self {
            servers: self.servers.clone(),
            manager: self.manager.clone(),
            configs: self.configs.clone(),
            audit: self.audit.clone(),
            llm: self.llm.clone(),
        };

        tokio::spawn(async move {
            let outcome = orchestrator.run(&message, &tx).await;

            let (final_event, summary) = match outcome {
                Ok((answer, payload)) => {
                    let summary = answer.chars().take(200).collect::<String>();
                    (AgentEvent::answer(answer, payload), summary)
                }
                Err(e) => {
                    let text = e.to_string();
                    (AgentEvent::error(text.clone()), text)
                }
            };
            let _ = tx.send(final_event).await;

            orchestrator
                .audit
                .record(
                    NewAuditLog::new("agent.chat")
                        .user(actor.id, actor.username)
                        .ip(actor.ip)
                        .detail(message)
                        .response(summary),
                )
                .await;
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    use crate::domain::McpTransport;

    fn server(name: &str) -> McpServer {
        McpServer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            transport: McpTransport::Http,
            command: None,
            args: vec![],
            env: HashMap::new(),
            base_url: Some("http://localhost:8080".to_string()),
            headers: HashMap::new(),
            enabled: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn server_selection_matches_name_keywords() {
        let servers = vec![server("weather"), server("jira")];

        assert_eq!(match_server_name("file a Jira ticket", &servers), Some(1));
        assert_eq!(match_server_name("what is the WEATHER today", &servers), Some(0));
        assert_eq!(match_server_name("unrelated question", &servers), None);
    }

    #[test]
    fn strip_fences_unwraps_json_blocks() {
        assert_eq!(strip_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn events_serialize_with_wire_field_names() {
        let value = serde_json::to_value(AgentEvent::tool_call("lookup")).unwrap();
        assert_eq!(value["type"], "tool_call");
        assert_eq!(value["content"], "lookup");
        assert_eq!(value["is_final"], false);
        // absent payloads are omitted, not null
        assert!(value.get("llm_result").is_none());
    }

    #[test]
    fn events_mark_finality_correctly() {
        assert!(!AgentEvent::status("x").is_final);
        assert!(!AgentEvent::tool_call("x").is_final);
        assert!(!AgentEvent::tool_result("x", None).is_final);
        assert!(AgentEvent::answer("x", None).is_final);
        assert!(AgentEvent::error("x").is_final);
    }
}
