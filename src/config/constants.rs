//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// RBAC
// =============================================================================

/// Protected administrator role (cannot be deleted or renamed)
pub const ROLE_ADMIN: &str = "admin";

/// Wildcard permission held by the admin role; satisfies every check
pub const PERM_ADMIN_ALL: &str = "admin:all";

/// Manage users, roles, and role-permission assignments
pub const PERM_USER_MANAGE: &str = "user:manage";

/// Run natural-language queries
pub const PERM_QUERY_RUN: &str = "query:run";

/// Ask questions against the knowledge base
pub const PERM_KB_USE: &str = "kb:use";

/// Upload documents and manage vector collections
pub const PERM_KB_MANAGE: &str = "kb:manage";

/// Use agent chat mode
pub const PERM_AGENT_USE: &str = "agent:use";

/// Register and manage MCP servers
pub const PERM_MCP_MANAGE: &str = "mcp:manage";

/// Look up skills
pub const PERM_SKILL_USE: &str = "skill:use";

/// Create and edit skills
pub const PERM_SKILL_MANAGE: &str = "skill:manage";

/// Use mapping analysis projects
pub const PERM_MAPPING_USE: &str = "mapping:use";

/// Manage runtime configuration entries
pub const PERM_CONFIG_MANAGE: &str = "config:manage";

/// View audit logs
pub const PERM_AUDIT_VIEW: &str = "audit:view";

/// Edit schema metadata
pub const PERM_SCHEMA_MANAGE: &str = "schema:manage";

/// Full permission catalogue seeded by the initial migration
pub const ALL_PERMISSIONS: &[(&str, &str)] = &[
    (PERM_ADMIN_ALL, "All permissions (admin wildcard)"),
    (PERM_USER_MANAGE, "Manage users and roles"),
    (PERM_QUERY_RUN, "Run natural-language queries"),
    (PERM_KB_USE, "Query the knowledge base"),
    (PERM_KB_MANAGE, "Manage knowledge base documents and collections"),
    (PERM_AGENT_USE, "Use agent chat mode"),
    (PERM_MCP_MANAGE, "Manage MCP server registrations"),
    (PERM_SKILL_USE, "Look up skills"),
    (PERM_SKILL_MANAGE, "Manage the skill library"),
    (PERM_MAPPING_USE, "Use mapping analysis projects"),
    (PERM_CONFIG_MANAGE, "Manage configuration entries"),
    (PERM_AUDIT_VIEW, "View audit logs"),
    (PERM_SCHEMA_MANAGE, "Edit schema metadata"),
];

// =============================================================================
// Query feature
// =============================================================================

/// Maximum rows returned from a generated SQL query
pub const MAX_QUERY_ROWS: usize = 500;

/// Number of recent query samples replayed into the prompt as examples
pub const PROMPT_SAMPLE_COUNT: u64 = 5;

// =============================================================================
// Knowledge base
// =============================================================================

/// Maximum characters per document chunk
pub const CHUNK_MAX_CHARS: usize = 1000;

/// Overlap carried between adjacent chunks
pub const CHUNK_OVERLAP_CHARS: usize = 100;

/// Default number of hits returned from vector search
pub const DEFAULT_TOP_K: usize = 5;

/// Vector collection mirroring active skills
pub const SKILL_COLLECTION: &str = "skills";

/// Default vector collection for knowledge base documents
pub const KB_COLLECTION: &str = "knowledge_base";

// =============================================================================
// Runtime configuration keys (stored in the configurations table)
// =============================================================================

/// LLM completion endpoint URL
pub const CFG_LLM_ENDPOINT: &str = "llm.endpoint";

/// LLM model identifier
pub const CFG_LLM_MODEL: &str = "llm.model";

/// LLM API key (sensitive)
pub const CFG_LLM_API_KEY: &str = "llm.api_key";

/// Mask shown in place of sensitive configuration values
pub const SENSITIVE_VALUE_MASK: &str = "******";
