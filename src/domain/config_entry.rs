//! Runtime configuration entry domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::SENSITIVE_VALUE_MASK;
use crate::errors::{AppError, AppResult};

/// Declared type of a configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Json,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Json => "json",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "string" => Ok(ValueType::String),
            "int" => Ok(ValueType::Int),
            "float" => Ok(ValueType::Float),
            "bool" => Ok(ValueType::Bool),
            "json" => Ok(ValueType::Json),
            other => Err(AppError::validation(format!(
                "Unknown value type: {}",
                other
            ))),
        }
    }
}

/// Runtime configuration entry
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub category: String,
    pub sensitive: bool,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl ConfigEntry {
    /// Validate that the stored value parses under the declared type.
    pub fn check_value(value: &str, value_type: ValueType) -> AppResult<()> {
        let ok = match value_type {
            ValueType::String => true,
            ValueType::Int => value.parse::<i64>().is_ok(),
            ValueType::Float => value.parse::<f64>().is_ok(),
            ValueType::Bool => matches!(value, "true" | "false"),
            ValueType::Json => serde_json::from_str::<serde_json::Value>(value).is_ok(),
        };
        if ok {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Value does not parse as {}",
                value_type.as_str()
            )))
        }
    }

    pub fn as_int(&self) -> AppResult<i64> {
        self.value
            .parse()
            .map_err(|_| AppError::validation(format!("{} is not an int", self.key)))
    }

    pub fn as_bool(&self) -> AppResult<bool> {
        match self.value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AppError::validation(format!("{} is not a bool", self.key))),
        }
    }
}

/// Configuration entry as returned to clients; sensitive values are masked.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConfigEntryResponse {
    pub key: String,
    pub value: String,
    pub value_type: ValueType,
    pub category: String,
    pub sensitive: bool,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

impl From<ConfigEntry> for ConfigEntryResponse {
    fn from(entry: ConfigEntry) -> Self {
        let value = if entry.sensitive {
            SENSITIVE_VALUE_MASK.to_string()
        } else {
            entry.value
        };
        Self {
            key: entry.key,
            value,
            value_type: entry.value_type,
            category: entry.category,
            sensitive: entry.sensitive,
            description: entry.description,
            updated_at: entry.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_type_roundtrip() {
        for vt in [
            ValueType::String,
            ValueType::Int,
            ValueType::Float,
            ValueType::Bool,
            ValueType::Json,
        ] {
            assert_eq!(ValueType::parse(vt.as_str()).unwrap(), vt);
        }
    }

    #[test]
    fn test_check_value_rejects_mismatch() {
        assert!(ConfigEntry::check_value("abc", ValueType::Int).is_err());
        assert!(ConfigEntry::check_value("42", ValueType::Int).is_ok());
        assert!(ConfigEntry::check_value("maybe", ValueType::Bool).is_err());
        assert!(ConfigEntry::check_value("{\"a\":1}", ValueType::Json).is_ok());
    }

    #[test]
    fn test_sensitive_value_is_masked() {
        let entry = ConfigEntry {
            key: "llm.api_key".into(),
            value: "sk-secret".into(),
            value_type: ValueType::String,
            category: "llm".into(),
            sensitive: true,
            description: String::new(),
            updated_at: Utc::now(),
        };
        let resp = ConfigEntryResponse::from(entry);
        assert_eq!(resp.value, SENSITIVE_VALUE_MASK);
    }
}
