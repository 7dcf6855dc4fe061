//! Service layer - Business logic orchestration
//!
//! Services coordinate domain operations through repository traits and
//! external clients; handlers stay thin.

mod agent_service;
mod audit_service;
mod auth_service;
pub mod chunker;
mod config_service;
mod container;
mod knowledge_service;
mod mapping_service;
mod mcp_service;
mod query_service;
mod role_service;
mod schema_service;
mod skill_service;
pub mod sql_guard;
mod user_service;

use uuid::Uuid;

pub use agent_service::{AgentEvent, AgentEventType, AgentOrchestrator, AgentService};
pub use audit_service::{AuditService, AuditTrail};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use config_service::{ConfigAdmin, ConfigService, ConfigUpsert};
pub use container::{ServiceContainer, Services};
pub use knowledge_service::{KbAnswer, KnowledgeBase, KnowledgeService, UploadReport};
pub use mapping_service::{Download, MappingDesk, MappingService, Upload};
pub use mcp_service::{McpRegistry, McpRegistryService};
pub use query_service::{QueryRunner, QueryService};
pub use role_service::{RoleManager, RoleService};
pub use schema_service::{SchemaCatalogue, SchemaService};
pub use skill_service::{SkillLibrary, SkillService};
pub use user_service::{NewUser, UserManager, UserService, UserUpdate};

// Export mock for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

/// The authenticated user on whose behalf a service call runs.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub ip: String,
}
