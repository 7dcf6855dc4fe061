//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::Role;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Collect the full permission set granted through the user's roles.
    pub fn permissions(&self) -> Vec<String> {
        let mut perms: Vec<String> = self
            .roles
            .iter()
            .flat_map(|r| r.permissions.iter().map(|p| p.name.clone()))
            .collect();
        perms.sort();
        perms.dedup();
        perms
    }

    /// Check whether any of the user's roles is the protected admin role.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r.name == crate::config::ROLE_ADMIN)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// Login name
    #[schema(example = "jdoe")]
    pub username: String,
    /// User email address
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Whether the account can log in
    pub active: bool,
    /// Names of assigned roles
    pub roles: Vec<String>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            active: user.active,
            roles: user.roles.into_iter().map(|r| r.name).collect(),
            created_at: user.created_at,
        }
    }
}
