//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    agent_handler, audit_handler, auth_handler, config_handler, kb_handler, mapping_handler,
    mcp_handler, query_handler, role_handler, schema_handler, skill_handler, user_handler,
};
use crate::domain::{
    AuditLog, ConfigEntryResponse, McpServer, McpTransport, Permission, QueryResult, QuerySample,
    RoleResponse, SchemaColumn, SchemaTable, Skill, SkillCategory, SkillStatus, UserResponse,
    ValueType,
};
use crate::domain::{MappingDocument, MappingProject};
use crate::services::{AgentEvent, AgentEventType, KbAnswer, TokenResponse, UploadReport};

/// OpenAPI documentation for the Text2SQL Assistant
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Text2SQL Assistant",
        version = "0.1.0",
        description = "Natural-language-to-SQL backend with RBAC, knowledge base, and MCP agent mode",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::login,
        // Users
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::reset_password,
        user_handler::delete_user,
        // Roles and permissions
        role_handler::list_roles,
        role_handler::get_role,
        role_handler::create_role,
        role_handler::update_role,
        role_handler::delete_role,
        role_handler::list_permissions,
        // Query
        query_handler::run_query,
        query_handler::list_samples,
        // Knowledge base
        kb_handler::list_collections,
        kb_handler::create_collection,
        kb_handler::delete_collection,
        kb_handler::upload_document,
        kb_handler::ask,
        // Agent
        agent_handler::chat,
        // MCP registry
        mcp_handler::list_servers,
        mcp_handler::get_server,
        mcp_handler::register_server,
        mcp_handler::update_server,
        mcp_handler::enable_server,
        mcp_handler::disable_server,
        mcp_handler::delete_server,
        mcp_handler::list_tools,
        // Skills
        skill_handler::list_skills,
        skill_handler::search_skills,
        skill_handler::get_skill,
        skill_handler::create_skill,
        skill_handler::update_skill,
        skill_handler::delete_skill,
        // Mapping
        mapping_handler::list_projects,
        mapping_handler::get_project,
        mapping_handler::create_project,
        mapping_handler::update_project,
        mapping_handler::delete_project,
        mapping_handler::list_documents,
        mapping_handler::upload_document,
        mapping_handler::download_document,
        mapping_handler::delete_document,
        mapping_handler::analyze,
        // Configuration
        config_handler::list_config,
        config_handler::get_config,
        config_handler::upsert_config,
        config_handler::delete_config,
        // Audit
        audit_handler::list_audit,
        // Schema metadata
        schema_handler::schema_tree,
        schema_handler::get_table,
        schema_handler::create_table,
        schema_handler::update_table,
        schema_handler::delete_table,
        schema_handler::add_column,
        schema_handler::update_column,
        schema_handler::delete_column,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            RoleResponse,
            Permission,
            QueryResult,
            QuerySample,
            Skill,
            SkillCategory,
            SkillStatus,
            McpServer,
            McpTransport,
            ConfigEntryResponse,
            ValueType,
            AuditLog,
            SchemaTable,
            SchemaColumn,
            MappingProject,
            MappingDocument,
            // Service types
            TokenResponse,
            UploadReport,
            KbAnswer,
            AgentEvent,
            AgentEventType,
            // Request types
            auth_handler::LoginRequest,
            user_handler::CreateUserRequest,
            user_handler::UpdateUserRequest,
            user_handler::ResetPasswordRequest,
            role_handler::CreateRoleRequest,
            role_handler::UpdateRoleRequest,
            query_handler::QueryRequest,
            kb_handler::CreateCollectionRequest,
            kb_handler::AskRequest,
            agent_handler::ChatRequest,
            mcp_handler::ServerRequest,
            skill_handler::SkillRequest,
            mapping_handler::CreateProjectRequest,
            mapping_handler::UpdateProjectRequest,
            mapping_handler::AnalysisResponse,
            config_handler::UpsertConfigRequest,
            schema_handler::CreateTableRequest,
            schema_handler::UpdateTableRequest,
            schema_handler::ColumnRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and token issuance"),
        (name = "Users", description = "User administration"),
        (name = "Roles", description = "Role and permission administration"),
        (name = "Query", description = "Natural-language query pipeline"),
        (name = "Knowledge Base", description = "Document indexing and retrieval Q&A"),
        (name = "Agent", description = "MCP-backed agent chat"),
        (name = "MCP", description = "MCP server registry"),
        (name = "Skills", description = "Skill library"),
        (name = "Mapping", description = "Mapping projects and analysis"),
        (name = "Configuration", description = "Runtime configuration entries"),
        (name = "Audit", description = "Audit log"),
        (name = "Schema", description = "Target database schema metadata")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
