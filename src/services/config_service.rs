//! Configuration service - Runtime configuration entries.
//!
//! Values live in the database so operators can repoint the LLM backend
//! without a restart. Sensitive values are masked on the way out and the
//! query feature reads its connection settings through the typed accessor.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

use crate::config::{CFG_LLM_API_KEY, CFG_LLM_ENDPOINT, CFG_LLM_MODEL};
use crate::domain::{ConfigEntry, ConfigEntryResponse, ValueType};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::ConfigRepository;
use crate::infra::LlmSettings;

/// Fields accepted when upserting a configuration entry
#[derive(Debug, Clone)]
pub struct ConfigUpsert {
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub category: String,
    pub sensitive: bool,
    pub description: String,
}

/// Configuration service trait for dependency injection.
#[async_trait]
pub trait ConfigService: Send + Sync {
    /// All entries, sensitive values masked.
    async fn list(&self) -> AppResult<Vec<ConfigEntryResponse>>;

    /// One entry, sensitive value masked.
    async fn get(&self, key: &str) -> AppResult<ConfigEntryResponse>;

    /// Idempotent: upserting the same key+value again is a no-op apart
    /// from the updated_at refresh.
    async fn upsert(&self, upsert: ConfigUpsert) -> AppResult<ConfigEntryResponse>;

    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Resolve LLM connection settings from `llm.*` entries.
    async fn llm_settings(&self) -> AppResult<LlmSettings>;
}

/// Concrete implementation of ConfigService.
pub struct ConfigAdmin {
    configs: Arc<dyn ConfigRepository>,
}

impl ConfigAdmin {
    pub fn new(configs: Arc<dyn ConfigRepository>) -> Self {
        Self { configs }
    }
}

#[async_trait]
impl ConfigService for ConfigAdmin {
    async fn list(&self) -> AppResult<Vec<ConfigEntryResponse>> {
        let entries = self.configs.list().await?;
        Ok(entries.into_iter().map(ConfigEntryResponse::from).collect())
    }

    async fn get(&self, key: &str) -> AppResult<ConfigEntryResponse> {
        let entry = self.configs.get(key).await?.ok_or_not_found()?;
        Ok(entry.into())
    }

    async fn upsert(&self, upsert: ConfigUpsert) -> AppResult<ConfigEntryResponse> {
        ConfigEntry::check_value(&upsert.value, upsert.value_type)?;

        let entry = self
            .configs
            .upsert(ConfigEntry {
                key: upsert.key,
                value: upsert.value,
                value_type: upsert.value_type,
                category: upsert.category,
                sensitive: upsert.sensitive,
                description: upsert.description,
                updated_at: Utc::now(),
            })
            .await?;
        Ok(entry.into())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.configs.delete(key).await
    }

    async fn llm_settings(&self) -> AppResult<LlmSettings> {
        let endpoint = self
            .configs
            .get(CFG_LLM_ENDPOINT)
            .await?
            .ok_or_else(|| AppError::validation("llm.endpoint is not configured"))?
            .value;
        let model = self
            .configs
            .get(CFG_LLM_MODEL)
            .await?
            .ok_or_else(|| AppError::validation("llm.model is not configured"))?
            .value;
        let api_key = self.configs.get(CFG_LLM_API_KEY).await?.map(|e| e.value);

        Ok(LlmSettings {
            endpoint,
            model,
            api_key,
        })
    }
}
