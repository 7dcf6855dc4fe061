//! Role and permission domain entities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Named permission, e.g. `query:run`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Permission {
    pub id: Uuid,
    /// Permission name in `resource:action` form
    #[schema(example = "query:run")]
    pub name: String,
    pub description: String,
}

/// Role grouping a set of permissions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Role {
    pub id: Uuid,
    #[schema(example = "analyst")]
    pub name: String,
    pub description: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    /// The `admin` role is protected from deletion and renaming.
    pub fn is_protected(&self) -> bool {
        self.name == crate::config::ROLE_ADMIN
    }
}

/// Role response with permission names flattened
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            permissions: role.permissions.into_iter().map(|p| p.name).collect(),
        }
    }
}
