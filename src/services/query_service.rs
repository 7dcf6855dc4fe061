//! Query service - The natural-language to SQL pipeline.
//!
//! Pipeline: build a prompt from schema metadata and recent samples, ask
//! the configured LLM for SQL, sanitize it, execute read-only against the
//! target database, persist a sample on success, audit either way.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, FromQueryResult, JsonValue, Statement};
use std::sync::Arc;

use super::config_service::ConfigService;
use super::sql_guard;
use super::Actor;
use crate::config::{MAX_QUERY_ROWS, PROMPT_SAMPLE_COUNT};
use crate::domain::{NewAuditLog, QueryResult, QuerySample};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::{QuerySampleRepository, SchemaRepository};
use crate::infra::{ChatMessage, LlmClient};
use crate::services::AuditService;
use crate::types::PaginationParams;

const SYSTEM_PROMPT: &str = "You are a SQL assistant. Given the database schema and a question, \
respond with a single read-only SQL statement in a ```sql fenced block. \
Only SELECT (or WITH) statements are allowed. You may add a one-sentence \
explanation after the block.";

/// Query service trait for dependency injection.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Run the full question -> SQL -> rows pipeline.
    async fn run(&self, question: String, actor: &Actor) -> AppResult<QueryResult>;

    async fn samples(&self, params: &PaginationParams) -> AppResult<(Vec<QuerySample>, u64)>;
}

/// Concrete implementation of QueryService.
pub struct QueryRunner {
    target_db: DatabaseConnection,
    schema: Arc<dyn SchemaRepository>,
    samples: Arc<dyn QuerySampleRepository>,
    configs: Arc<dyn ConfigService>,
    audit: Arc<dyn AuditService>,
    llm: LlmClient,
}

impl QueryRunner {
    pub fn new(
        target_db: DatabaseConnection,
        schema: Arc<dyn SchemaRepository>,
        samples: Arc<dyn QuerySampleRepository>,
        configs: Arc<dyn ConfigService>,
        audit: Arc<dyn AuditService>,
        llm: LlmClient,
    ) -> Self {
        Self {
            target_db,
            schema,
            samples,
            configs,
            audit,
            llm,
        }
    }

    async fn build_prompt(&self, question: &str) -> AppResult<String> {
        let tables = self.schema.list_tables().await?;
        let recent = self.samples.recent(PROMPT_SAMPLE_COUNT).await?;

        let mut prompt = String::from("Database schema:\n");
        if tables.is_empty() {
            prompt.push_str("(no schema metadata recorded)\n");
        }
        for table in &tables {
            prompt.push_str(&table.prompt_fragment());
        }

        if !recent.is_empty() {
            prompt.push_str("\nExample queries:\n");
            for sample in &recent {
                prompt.push_str(&format!("Q: {}\nSQL: {}\n", sample.question, sample.sql_text));
            }
        }

        prompt.push_str(&format!("\nQuestion: {}", question));
        Ok(prompt)
    }

    /// Execute a sanitized statement, capping the row count.
    async fn execute(&self, sql: &str) -> AppResult<QueryResult> {
        // Fetch one row past the cap to detect truncation
        let capped = if sql_guard::has_limit_clause(sql) {
            sql.to_string()
        } else {
            format!("{} LIMIT {}", sql, MAX_QUERY_ROWS + 1)
        };

        let stmt = Statement::from_string(self.target_db.get_database_backend(), capped);
        let mut json_rows = JsonValue::find_by_statement(stmt)
            .all(&self.target_db)
            .await
            .map_err(AppError::from)?;

        let truncated = json_rows.len() > MAX_QUERY_ROWS;
        json_rows.truncate(MAX_QUERY_ROWS);

        let columns: Vec<String> = json_rows
            .first()
            .and_then(|row| row.as_object())
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();

        let rows = json_rows
            .into_iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| row.get(col).cloned().unwrap_or(serde_json::Value::Null))
                    .collect()
            })
            .collect();

        Ok(QueryResult {
            sql: sql.to_string(),
            columns,
            rows,
            truncated,
            explanation: None,
        })
    }
}

#[async_trait]
impl QueryService for QueryRunner {
    async fn run(&self, question: String, actor: &Actor) -> AppResult<QueryResult> {
        let settings = self.configs.llm_settings().await?;
        let prompt = self.build_prompt(&question).await?;

        let messages = [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let completion = self.llm.complete(&settings, &messages).await?;

        let (raw_sql, explanation) = sql_guard::extract_sql_and_explanation(&completion);
        let sql = match sql_guard::sanitize(&raw_sql) {
            Ok(sql) => sql,
            Err(e) => {
                self.audit
                    .record(
                        NewAuditLog::new("query.rejected")
                            .user(actor.id, actor.username.clone())
                            .ip(actor.ip.clone())
                            .detail(question)
                            .sql(raw_sql),
                    )
                    .await;
                return Err(e);
            }
        };

        let result = self.execute(&sql).await;
        match result {
            Ok(mut result) => {
                result.explanation = explanation;
                self.samples
                    .insert(question.clone(), sql.clone(), Some(actor.id))
                    .await?;
                self.audit
                    .record(
                        NewAuditLog::new("query.run")
                            .user(actor.id, actor.username.clone())
                            .ip(actor.ip.clone())
                            .detail(question)
                            .sql(sql)
                            .response(format!("{} rows", result.rows.len())),
                    )
                    .await;
                Ok(result)
            }
            Err(e) => {
                self.audit
                    .record(
                        NewAuditLog::new("query.failed")
                            .user(actor.id, actor.username.clone())
                            .ip(actor.ip.clone())
                            .detail(question)
                            .sql(sql),
                    )
                    .await;
                Err(e)
            }
        }
    }

    async fn samples(&self, params: &PaginationParams) -> AppResult<(Vec<QuerySample>, u64)> {
        self.samples.list(params).await
    }
}
