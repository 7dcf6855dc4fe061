//! Skill library service.
//!
//! SQL is the source of truth; active skills are mirrored into the
//! `skills` vector collection so agent flows can look them up
//! semantically. The mirror follows every create/update/delete.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::SKILL_COLLECTION;
use crate::domain::{Skill, SkillCategory};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{SkillDraft, SkillRepository};
use crate::infra::{VectorDocument, VectorStoreClient};
use crate::types::PaginationParams;

/// Skill service trait for dependency injection.
#[async_trait]
pub trait SkillService: Send + Sync {
    async fn get_skill(&self, id: Uuid) -> AppResult<Skill>;

    async fn list_skills(
        &self,
        category: Option<SkillCategory>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Skill>, u64)>;

    async fn create_skill(&self, draft: SkillDraft) -> AppResult<Skill>;

    async fn update_skill(&self, id: Uuid, draft: SkillDraft) -> AppResult<Skill>;

    async fn delete_skill(&self, id: Uuid) -> AppResult<()>;

    /// Semantic lookup merged with exact name/tag matches.
    async fn search(&self, term: &str) -> AppResult<Vec<Skill>>;
}

/// Concrete implementation of SkillService.
pub struct SkillLibrary {
    skills: Arc<dyn SkillRepository>,
    vector: VectorStoreClient,
}

impl SkillLibrary {
    pub fn new(skills: Arc<dyn SkillRepository>, vector: VectorStoreClient) -> Self {
        Self { skills, vector }
    }

    /// Reconcile the vector mirror with the skill's current state.
    /// Mirror failures are logged, not surfaced: the SQL row is committed
    /// and the mirror catches up on the next write.
    async fn sync_mirror(&self, skill: &Skill) {
        let result = if skill.is_indexable() {
            self.vector
                .add_documents(
                    SKILL_COLLECTION,
                    &[VectorDocument {
                        id: skill.id.to_string(),
                        text: skill.index_document(),
                        metadata: json!({
                            "skill_id": skill.id,
                            "name": skill.name,
                            "category": skill.category.as_str(),
                        }),
                    }],
                )
                .await
        } else {
            self.vector
                .delete_documents(SKILL_COLLECTION, &[skill.id.to_string()])
                .await
        };

        if let Err(e) = result {
            tracing::warn!(skill = %skill.name, error = %e, "skill vector mirror out of sync");
        }
    }
}

#[async_trait]
impl SkillService for SkillLibrary {
    async fn get_skill(&self, id: Uuid) -> AppResult<Skill> {
        self.skills.find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_skills(
        &self,
        category: Option<SkillCategory>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Skill>, u64)> {
        self.skills.list(category, params).await
    }

    async fn create_skill(&self, draft: SkillDraft) -> AppResult<Skill> {
        if self.skills.find_by_name(&draft.name).await?.is_some() {
            return Err(AppError::conflict("Skill"));
        }

        let skill = self.skills.create(draft).await?;
        self.sync_mirror(&skill).await;
        Ok(skill)
    }

    async fn update_skill(&self, id: Uuid, draft: SkillDraft) -> AppResult<Skill> {
        if let Some(other) = self.skills.find_by_name(&draft.name).await? {
            if other.id != id {
                return Err(AppError::conflict("Skill"));
            }
        }

        let skill = self.skills.update(id, draft).await?;
        self.sync_mirror(&skill).await;
        Ok(skill)
    }

    async fn delete_skill(&self, id: Uuid) -> AppResult<()> {
        let skill = self.skills.find_by_id(id).await?.ok_or_not_found()?;
        self.skills.delete(id).await?;

        if let Err(e) = self
            .vector
            .delete_documents(SKILL_COLLECTION, &[skill.id.to_string()])
            .await
        {
            tracing::warn!(skill = %skill.name, error = %e, "failed to drop skill from vector index");
        }
        Ok(())
    }

    async fn search(&self, term: &str) -> AppResult<Vec<Skill>> {
        let mut skills = self.skills.search_text(term).await?;

        // Enrich with semantic hits; vector outage degrades to exact matches
        match self.vector.query(SKILL_COLLECTION, term, 10).await {
            Ok(hits) => {
                for hit in hits {
                    let Ok(id) = Uuid::parse_str(&hit.id) else {
                        continue;
                    };
                    if skills.iter().any(|s| s.id == id) {
                        continue;
                    }
                    if let Some(skill) = self.skills.find_by_id(id).await? {
                        skills.push(skill);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "semantic skill search unavailable");
            }
        }

        Ok(skills)
    }
}
