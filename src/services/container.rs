//! Service Container - Centralized service access.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::sync::Arc;

use super::{
    AgentService, AuditService, AuthService, ConfigService, KnowledgeService, MappingService,
    McpRegistryService, QueryService, RoleService, SchemaService, SkillService, UserService,
};
use crate::config::Config;
use crate::infra::{
    DocumentStorage, LlmClient, McpClientManager, Persistence, VectorStoreClient,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn roles(&self) -> Arc<dyn RoleService>;

    fn audit(&self) -> Arc<dyn AuditService>;

    fn configs(&self) -> Arc<dyn ConfigService>;

    fn query(&self) -> Arc<dyn QueryService>;

    fn knowledge(&self) -> Arc<dyn KnowledgeService>;

    fn skills(&self) -> Arc<dyn SkillService>;

    fn mappings(&self) -> Arc<dyn MappingService>;

    fn mcp(&self) -> Arc<dyn McpRegistryService>;

    fn agent(&self) -> Arc<dyn AgentService>;

    fn schema(&self) -> Arc<dyn SchemaService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    role_service: Arc<dyn RoleService>,
    audit_service: Arc<dyn AuditService>,
    config_service: Arc<dyn ConfigService>,
    query_service: Arc<dyn QueryService>,
    knowledge_service: Arc<dyn KnowledgeService>,
    skill_service: Arc<dyn SkillService>,
    mapping_service: Arc<dyn MappingService>,
    mcp_service: Arc<dyn McpRegistryService>,
    agent_service: Arc<dyn AgentService>,
    schema_service: Arc<dyn SchemaService>,
}

impl Services {
    /// Wire every service from the application database, the target
    /// database the query feature executes against, and the config.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        target_db: sea_orm::DatabaseConnection,
        config: Config,
    ) -> Self {
        use super::{
            AgentOrchestrator, AuditTrail, Authenticator, ConfigAdmin, KnowledgeBase,
            MappingDesk, McpRegistry, QueryRunner, RoleManager, SchemaCatalogue, SkillLibrary,
            UserManager,
        };

        let persistence = Persistence::new(db);
        let llm = LlmClient::new();
        let vector = VectorStoreClient::new(config.vector_service_url.clone());
        let manager = McpClientManager::new();
        let storage = DocumentStorage::new(config.upload_root.clone());

        let audit_service: Arc<dyn AuditService> = Arc::new(AuditTrail::new(persistence.audit()));
        let config_service: Arc<dyn ConfigService> =
            Arc::new(ConfigAdmin::new(persistence.configs()));

        let auth_service = Arc::new(Authenticator::new(
            persistence.users(),
            persistence.audit(),
            config,
        ));
        let user_service = Arc::new(UserManager::new(
            persistence.users(),
            persistence.audit(),
        ));
        let role_service = Arc::new(RoleManager::new(
            persistence.roles(),
            persistence.audit(),
        ));
        let query_service = Arc::new(QueryRunner::new(
            target_db,
            persistence.schema(),
            persistence.query_samples(),
            config_service.clone(),
            audit_service.clone(),
            llm.clone(),
        ));
        let knowledge_service = Arc::new(KnowledgeBase::new(
            vector.clone(),
            llm.clone(),
            config_service.clone(),
        ));
        let skill_service = Arc::new(SkillLibrary::new(persistence.skills(), vector.clone()));
        let mapping_service = Arc::new(MappingDesk::new(
            persistence.mappings(),
            storage,
            config_service.clone(),
            audit_service.clone(),
            llm.clone(),
        ));
        let mcp_service = Arc::new(McpRegistry::new(
            persistence.mcp_servers(),
            manager.clone(),
        ));
        let agent_service = Arc::new(AgentOrchestrator::new(
            persistence.mcp_servers(),
            manager,
            config_service.clone(),
            audit_service.clone(),
            llm,
        ));
        let schema_service = Arc::new(SchemaCatalogue::new(persistence.schema()));

        Self {
            auth_service,
            user_service,
            role_service,
            audit_service,
            config_service,
            query_service,
            knowledge_service,
            skill_service,
            mapping_service,
            mcp_service,
            agent_service,
            schema_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.role_service.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit_service.clone()
    }

    fn configs(&self) -> Arc<dyn ConfigService> {
        self.config_service.clone()
    }

    fn query(&self) -> Arc<dyn QueryService> {
        self.query_service.clone()
    }

    fn knowledge(&self) -> Arc<dyn KnowledgeService> {
        self.knowledge_service.clone()
    }

    fn skills(&self) -> Arc<dyn SkillService> {
        self.skill_service.clone()
    }

    fn mappings(&self) -> Arc<dyn MappingService> {
        self.mapping_service.clone()
    }

    fn mcp(&self) -> Arc<dyn McpRegistryService> {
        self.mcp_service.clone()
    }

    fn agent(&self) -> Arc<dyn AgentService> {
        self.agent_service.clone()
    }

    fn schema(&self) -> Arc<dyn SchemaService> {
        self.schema_service.clone()
    }
}
