//! Skill library repository. JSON-encoded list columns are decoded at the
//! boundary into the domain type.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::skill;
use crate::domain::{Skill, SkillCategory, SkillStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Fields for creating or updating a skill
#[derive(Debug, Clone)]
pub struct SkillDraft {
    pub name: String,
    pub category: SkillCategory,
    pub tags: Vec<String>,
    pub prerequisites: Vec<String>,
    pub steps: Vec<String>,
    pub examples: Vec<String>,
    pub status: SkillStatus,
}

/// Skill repository trait for dependency injection.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Skill>>;

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Skill>>;

    async fn list(
        &self,
        category: Option<SkillCategory>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Skill>, u64)>;

    async fn create(&self, draft: SkillDraft) -> AppResult<Skill>;

    /// Full replace of mutable fields; bumps version.
    async fn update(&self, id: Uuid, draft: SkillDraft) -> AppResult<Skill>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Exact-ish lookup: name or tag containing the term.
    async fn search_text(&self, term: &str) -> AppResult<Vec<Skill>>;
}

/// Concrete implementation of SkillRepository
pub struct SkillStore {
    db: DatabaseConnection,
}

impl SkillStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn decode_list(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn encode_list(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

fn to_domain(m: skill::Model) -> AppResult<Skill> {
    Ok(Skill {
        id: m.id,
        name: m.name,
        category: SkillCategory::parse(&m.category)?,
        tags: decode_list(&m.tags),
        prerequisites: decode_list(&m.prerequisites),
        steps: decode_list(&m.steps),
        examples: decode_list(&m.examples),
        status: SkillStatus::parse(&m.status)?,
        version: m.version,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl SkillRepository for SkillStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Skill>> {
        let model = skill::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        model.map(to_domain).transpose()
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Skill>> {
        let model = skill::Entity::find()
            .filter(skill::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        model.map(to_domain).transpose()
    }

    async fn list(
        &self,
        category: Option<SkillCategory>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Skill>, u64)> {
        let mut query = skill::Entity::find().order_by_asc(skill::Column::Name);
        if let Some(category) = category {
            query = query.filter(skill::Column::Category.eq(category.as_str()));
        }

        let paginator = query.paginate(&self.db, params.limit());
        let total = paginator.num_items().await.map_err(AppError::from)?;
        let models = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await
            .map_err(AppError::from)?;

        let skills: AppResult<Vec<Skill>> = models.into_iter().map(to_domain).collect();
        Ok((skills?, total))
    }

    async fn create(&self, draft: SkillDraft) -> AppResult<Skill> {
        let now = Utc::now();
        let model = skill::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(draft.name),
            category: Set(draft.category.as_str().to_string()),
            tags: Set(encode_list(&draft.tags)),
            prerequisites: Set(encode_list(&draft.prerequisites)),
            steps: Set(encode_list(&draft.steps)),
            examples: Set(encode_list(&draft.examples)),
            status: Set(draft.status.as_str().to_string()),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        to_domain(model)
    }

    async fn update(&self, id: Uuid, draft: SkillDraft) -> AppResult<Skill> {
        let model = skill::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::NotFound)?;

        let version = model.version + 1;
        let mut active: skill::ActiveModel = model.into();
        active.name = Set(draft.name);
        active.category = Set(draft.category.as_str().to_string());
        active.tags = Set(encode_list(&draft.tags));
        active.prerequisites = Set(encode_list(&draft.prerequisites));
        active.steps = Set(encode_list(&draft.steps));
        active.examples = Set(encode_list(&draft.examples));
        active.status = Set(draft.status.as_str().to_string());
        active.version = Set(version);
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        to_domain(model)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = skill::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn search_text(&self, term: &str) -> AppResult<Vec<Skill>> {
        let pattern = format!("%{}%", term);
        let models = skill::Entity::find()
            .filter(
                Condition::any()
                    .add(skill::Column::Name.like(pattern.clone()))
                    .add(skill::Column::Tags.like(pattern)),
            )
            .order_by_asc(skill::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(to_domain).collect()
    }
}
