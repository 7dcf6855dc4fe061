//! Core business entities and logic.

mod audit;
mod config_entry;
mod mapping;
mod mcp;
mod password;
mod query;
mod role;
mod schema_meta;
mod skill;
mod user;

pub use audit::{AuditLog, NewAuditLog};
pub use config_entry::{ConfigEntry, ConfigEntryResponse, ValueType};
pub use mapping::{MappingDocument, MappingProject};
pub use mcp::{McpServer, McpTransport};
pub use password::Password;
pub use query::{QueryResult, QuerySample};
pub use role::{Permission, Role, RoleResponse};
pub use schema_meta::{SchemaColumn, SchemaTable};
pub use skill::{Skill, SkillCategory, SkillStatus};
pub use user::{User, UserResponse};
