//! Skill library domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Closed skill category enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Query,
    Analysis,
    Mapping,
    Integration,
    General,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Query => "query",
            SkillCategory::Analysis => "analysis",
            SkillCategory::Mapping => "mapping",
            SkillCategory::Integration => "integration",
            SkillCategory::General => "general",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "query" => Ok(SkillCategory::Query),
            "analysis" => Ok(SkillCategory::Analysis),
            "mapping" => Ok(SkillCategory::Mapping),
            "integration" => Ok(SkillCategory::Integration),
            "general" => Ok(SkillCategory::General),
            other => Err(AppError::validation(format!(
                "Unknown skill category: {}",
                other
            ))),
        }
    }
}

/// Skill lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    Active,
    Draft,
    Deprecated,
}

impl SkillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillStatus::Active => "active",
            SkillStatus::Draft => "draft",
            SkillStatus::Deprecated => "deprecated",
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            "active" => Ok(SkillStatus::Active),
            "draft" => Ok(SkillStatus::Draft),
            "deprecated" => Ok(SkillStatus::Deprecated),
            other => Err(AppError::validation(format!(
                "Unknown skill status: {}",
                other
            ))),
        }
    }
}

/// Skill library entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    /// Ordered execution steps
    pub steps: Vec<String>,
    pub examples: Vec<String>,
    pub status: SkillStatus,
    /// Bumped on every update
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    /// Text mirrored into the vector index for semantic lookup.
    pub fn index_document(&self) -> String {
        let mut doc = self.name.clone();
        if !self.tags.is_empty() {
            doc.push('\n');
            doc.push_str(&self.tags.join(", "));
        }
        for step in &self.steps {
            doc.push('\n');
            doc.push_str(step);
        }
        doc
    }

    /// Only active skills are mirrored into the vector index.
    pub fn is_indexable(&self) -> bool {
        self.status == SkillStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_rejects_unknown() {
        assert!(SkillCategory::parse("wizardry").is_err());
        assert_eq!(
            SkillCategory::parse("mapping").unwrap(),
            SkillCategory::Mapping
        );
    }

    #[test]
    fn test_only_active_skills_indexable() {
        let mut skill = Skill {
            id: Uuid::new_v4(),
            name: "join two tables".into(),
            category: SkillCategory::Query,
            tags: vec!["sql".into()],
            prerequisites: vec![],
            steps: vec!["identify keys".into(), "write join".into()],
            examples: vec![],
            status: SkillStatus::Draft,
            version: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(!skill.is_indexable());
        skill.status = SkillStatus::Active;
        assert!(skill.is_indexable());
        assert!(skill.index_document().contains("identify keys"));
    }
}
