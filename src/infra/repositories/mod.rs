//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;

mod audit_repository;
mod config_repository;
mod mapping_repository;
mod mcp_server_repository;
mod query_sample_repository;
mod role_repository;
mod schema_repository;
mod skill_repository;
mod user_repository;

pub use audit_repository::{AuditFilter, AuditRepository, AuditStore};
pub use config_repository::{ConfigRepository, ConfigStore};
pub use mapping_repository::{MappingRepository, MappingStore, NewDocument};
pub use mcp_server_repository::{McpServerDraft, McpServerRepository, McpServerStore};
pub use query_sample_repository::{QuerySampleRepository, QuerySampleStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use schema_repository::{ColumnDraft, SchemaRepository, SchemaStore};
pub use skill_repository::{SkillDraft, SkillRepository, SkillStore};
pub use user_repository::{UserRepository, UserStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
