//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod audit_log;
pub mod configuration;
pub mod mapping_document;
pub mod mapping_project;
pub mod mcp_server;
pub mod permission;
pub mod query_sample;
pub mod role;
pub mod role_permission;
pub mod schema_column;
pub mod schema_table;
pub mod skill;
pub mod user;
pub mod user_role;
