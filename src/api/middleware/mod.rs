//! API middleware.

mod auth;

pub use auth::{auth_middleware, client_ip, require_permission, CurrentUser};
