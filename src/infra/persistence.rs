//! Repository accessor container.
//!
//! Bundles one store per aggregate behind its trait object so services
//! depend on traits, not on SeaORM connections.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    AuditRepository, AuditStore, ConfigRepository, ConfigStore, MappingRepository, MappingStore,
    McpServerRepository, McpServerStore, QuerySampleRepository, QuerySampleStore, RoleRepository,
    RoleStore, SchemaRepository, SchemaStore, SkillRepository, SkillStore, UserRepository,
    UserStore,
};

/// Shared handle over every repository, cheap to clone.
#[derive(Clone)]
pub struct Persistence {
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    audit: Arc<AuditStore>,
    configs: Arc<ConfigStore>,
    mappings: Arc<MappingStore>,
    skills: Arc<SkillStore>,
    mcp_servers: Arc<McpServerStore>,
    query_samples: Arc<QuerySampleStore>,
    schema: Arc<SchemaStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            audit: Arc::new(AuditStore::new(db.clone())),
            configs: Arc::new(ConfigStore::new(db.clone())),
            mappings: Arc::new(MappingStore::new(db.clone())),
            skills: Arc::new(SkillStore::new(db.clone())),
            mcp_servers: Arc::new(McpServerStore::new(db.clone())),
            query_samples: Arc::new(QuerySampleStore::new(db.clone())),
            schema: Arc::new(SchemaStore::new(db)),
        }
    }

    pub fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    pub fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    pub fn audit(&self) -> Arc<dyn AuditRepository> {
        self.audit.clone()
    }

    pub fn configs(&self) -> Arc<dyn ConfigRepository> {
        self.configs.clone()
    }

    pub fn mappings(&self) -> Arc<dyn MappingRepository> {
        self.mappings.clone()
    }

    pub fn skills(&self) -> Arc<dyn SkillRepository> {
        self.skills.clone()
    }

    pub fn mcp_servers(&self) -> Arc<dyn McpServerRepository> {
        self.mcp_servers.clone()
    }

    pub fn query_samples(&self) -> Arc<dyn QuerySampleRepository> {
        self.query_samples.clone()
    }

    pub fn schema(&self) -> Arc<dyn SchemaRepository> {
        self.schema.clone()
    }
}
