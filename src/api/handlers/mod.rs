//! HTTP request handlers.

pub mod agent_handler;
pub mod audit_handler;
pub mod auth_handler;
pub mod config_handler;
pub mod kb_handler;
pub mod mapping_handler;
pub mod mcp_handler;
pub mod query_handler;
pub mod role_handler;
pub mod schema_handler;
pub mod skill_handler;
pub mod user_handler;

pub use agent_handler::agent_routes;
pub use audit_handler::audit_routes;
pub use auth_handler::auth_routes;
pub use config_handler::config_routes;
pub use kb_handler::kb_routes;
pub use mapping_handler::mapping_routes;
pub use mcp_handler::mcp_routes;
pub use query_handler::query_routes;
pub use role_handler::{permission_routes, role_routes};
pub use schema_handler::schema_routes;
pub use skill_handler::skill_routes;
pub use user_handler::user_routes;
