//! Runtime configuration repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set,
};

use super::entities::configuration;
use crate::domain::{ConfigEntry, ValueType};
use crate::errors::{AppError, AppResult};

/// Configuration repository trait for dependency injection.
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<ConfigEntry>>;

    async fn list(&self) -> AppResult<Vec<ConfigEntry>>;

    /// Idempotent upsert: inserts or overwrites the entry under `key`.
    async fn upsert(&self, entry: ConfigEntry) -> AppResult<ConfigEntry>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// Concrete implementation of ConfigRepository
pub struct ConfigStore {
    db: DatabaseConnection,
}

impl ConfigStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(m: configuration::Model) -> AppResult<ConfigEntry> {
    Ok(ConfigEntry {
        key: m.key,
        value: m.value,
        value_type: ValueType::parse(&m.value_type)?,
        category: m.category,
        sensitive: m.sensitive,
        description: m.description,
        updated_at: m.updated_at,
    })
}

#[async_trait]
impl ConfigRepository for ConfigStore {
    async fn get(&self, key: &str) -> AppResult<Option<ConfigEntry>> {
        let model = configuration::Entity::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        model.map(to_domain).transpose()
    }

    async fn list(&self) -> AppResult<Vec<ConfigEntry>> {
        let models = configuration::Entity::find()
            .order_by_asc(configuration::Column::Category)
            .order_by_asc(configuration::Column::Key)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn upsert(&self, entry: ConfigEntry) -> AppResult<ConfigEntry> {
        let existing = configuration::Entity::find_by_id(entry.key.clone())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let now = Utc::now();
        let model = match existing {
            Some(model) => {
                let mut active: configuration::ActiveModel = model.into();
                active.value = Set(entry.value);
                active.value_type = Set(entry.value_type.as_str().to_string());
                active.category = Set(entry.category);
                active.sensitive = Set(entry.sensitive);
                active.description = Set(entry.description);
                active.updated_at = Set(now);
                active.update(&self.db).await.map_err(AppError::from)?
            }
            None => {
                configuration::ActiveModel {
                    key: Set(entry.key),
                    value: Set(entry.value),
                    value_type: Set(entry.value_type.as_str().to_string()),
                    category: Set(entry.category),
                    sensitive: Set(entry.sensitive),
                    description: Set(entry.description),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await
                .map_err(AppError::from)?
            }
        };

        to_domain(model)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let result = configuration::Entity::delete_by_id(key.to_string())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
