//! Integration tests for API endpoints.
//!
//! These tests run real requests through the router with stub services,
//! an in-memory SQLite database, and no vector service.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::Utc;
use tower::ServiceExt;
use uuid::Uuid;

use text2sql::api::{create_router, AppState};
use text2sql::config::Config;
use text2sql::domain::{SchemaColumn, SchemaTable, User};
use text2sql::errors::{AppError, AppResult};
use text2sql::infra::repositories::ColumnDraft;
use text2sql::infra::{Database, VectorStoreClient};
use text2sql::services::{
    AgentService, AuditService, AuthService, Claims, ConfigService, KnowledgeService,
    MappingService, McpRegistryService, QueryService, RoleService, SchemaService,
    ServiceContainer, SkillService, TokenResponse, UserService,
};
use text2sql::types::PaginationParams;

const ADMIN_TOKEN: &str = "admin-test-token";
const ANALYST_TOKEN: &str = "analyst-test-token";

fn sample_user(id: Uuid) -> User {
    User {
        id,
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        password_hash: "hashed".to_string(),
        active: true,
        roles: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Stub Services
// =============================================================================

/// Auth service with two fixed tokens: an admin and a query-only analyst
struct StubAuth;

#[async_trait]
impl AuthService for StubAuth {
    async fn login(
        &self,
        username: String,
        password: String,
        _ip: String,
    ) -> AppResult<TokenResponse> {
        if username == "admin" && password == "secret" {
            Ok(TokenResponse {
                access_token: ADMIN_TOKEN.to_string(),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
                user: sample_user(Uuid::new_v4()).into(),
            })
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let permissions = match token {
            ADMIN_TOKEN => vec!["admin:all".to_string()],
            ANALYST_TOKEN => vec!["query:run".to_string()],
            _ => return Err(AppError::Unauthorized),
        };
        Ok(Claims {
            sub: Uuid::new_v4(),
            username: "jdoe".to_string(),
            permissions,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

/// User service returning canned data
struct StubUsers;

#[async_trait]
impl UserService for StubUsers {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        Ok(sample_user(id))
    }

    async fn list_users(&self, _params: &PaginationParams) -> AppResult<(Vec<User>, u64)> {
        Ok((vec![sample_user(Uuid::new_v4())], 1))
    }

    async fn create_user(
        &self,
        _new_user: text2sql::services::NewUser,
        _actor: &str,
    ) -> AppResult<User> {
        Ok(sample_user(Uuid::new_v4()))
    }

    async fn update_user(
        &self,
        id: Uuid,
        _update: text2sql::services::UserUpdate,
        _actor: &str,
    ) -> AppResult<User> {
        Ok(sample_user(id))
    }

    async fn reset_password(&self, _id: Uuid, _password: String, _actor: &str) -> AppResult<()> {
        Ok(())
    }

    async fn delete_user(&self, _id: Uuid, _actor: &str) -> AppResult<()> {
        Ok(())
    }
}

/// Schema service with one empty table
struct StubSchema;

#[async_trait]
impl SchemaService for StubSchema {
    async fn tree(&self) -> AppResult<Vec<SchemaTable>> {
        Ok(vec![SchemaTable {
            id: Uuid::new_v4(),
            table_name: "orders".to_string(),
            description: String::new(),
            columns: vec![],
        }])
    }

    async fn get_table(&self, _id: Uuid) -> AppResult<SchemaTable> {
        Err(AppError::NotFound)
    }

    async fn create_table(
        &self,
        _table_name: String,
        _description: String,
    ) -> AppResult<SchemaTable> {
        Err(AppError::NotFound)
    }

    async fn update_table(
        &self,
        _id: Uuid,
        _table_name: Option<String>,
        _description: Option<String>,
    ) -> AppResult<SchemaTable> {
        Err(AppError::NotFound)
    }

    async fn delete_table(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::NotFound)
    }

    async fn add_column(&self, _table_id: Uuid, _draft: ColumnDraft) -> AppResult<SchemaColumn> {
        Err(AppError::NotFound)
    }

    async fn update_column(&self, _id: Uuid, _draft: ColumnDraft) -> AppResult<SchemaColumn> {
        Err(AppError::NotFound)
    }

    async fn delete_column(&self, _id: Uuid) -> AppResult<()> {
        Err(AppError::NotFound)
    }
}

/// Container exposing the stubs; accessors for services these tests
/// never touch panic so misuse fails loudly.
struct StubContainer;

impl ServiceContainer for StubContainer {
    fn auth(&self) -> Arc<dyn AuthService> {
        Arc::new(StubAuth)
    }

    fn users(&self) -> Arc<dyn UserService> {
        Arc::new(StubUsers)
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        unimplemented!("roles not stubbed")
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        unimplemented!("audit not stubbed")
    }

    fn configs(&self) -> Arc<dyn ConfigService> {
        unimplemented!("configs not stubbed")
    }

    fn query(&self) -> Arc<dyn QueryService> {
        unimplemented!("query not stubbed")
    }

    fn knowledge(&self) -> Arc<dyn KnowledgeService> {
        unimplemented!("knowledge not stubbed")
    }

    fn skills(&self) -> Arc<dyn SkillService> {
        unimplemented!("skills not stubbed")
    }

    fn mappings(&self) -> Arc<dyn MappingService> {
        unimplemented!("mappings not stubbed")
    }

    fn mcp(&self) -> Arc<dyn McpRegistryService> {
        unimplemented!("mcp not stubbed")
    }

    fn agent(&self) -> Arc<dyn AgentService> {
        unimplemented!("agent not stubbed")
    }

    fn schema(&self) -> Arc<dyn SchemaService> {
        Arc::new(StubSchema)
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

async fn test_app() -> axum::Router {
    std::env::set_var("JWT_SECRET", "test-secret-key-for-testing-only-32chars");
    std::env::set_var("DATABASE_URL", "sqlite::memory:");
    let config = Config::from_env();

    // Stub services own all data; the database only needs to answer pings
    let database = Arc::new(
        Database::connect_without_migrations(&config)
            .await
            .expect("database"),
    );
    // Nothing listens here; vector-backed routes are not exercised
    let vector = VectorStoreClient::new("http://127.0.0.1:9".to_string());

    let state = AppState::new(Arc::new(StubContainer), database, vector);
    create_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body read");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn login_returns_token() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username":"admin","password":"secret"}"#))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["access_token"], ADMIN_TOKEN);
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn login_with_bad_credentials_is_unauthorized() {
    let app = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"username":"admin","password":"wrong"}"#))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/users/me", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/users/me", Some("not-a-real-token")))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn authenticated_user_reads_own_profile() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/users/me", Some(ANALYST_TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["username"], "jdoe");
}

#[tokio::test]
async fn admin_wildcard_grants_user_management() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/users", Some(ADMIN_TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["meta"]["total"], 1);
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let app = test_app().await;

    // The analyst token carries query:run only
    let response = app
        .oneshot(get("/api/users", Some(ANALYST_TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn query_permission_reads_schema_tree() {
    let app = test_app().await;

    let response = app
        .oneshot(get("/api/schema", Some(ANALYST_TOKEN)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body[0]["table_name"], "orders");
}

#[tokio::test]
async fn health_reports_degraded_when_vector_service_is_down() {
    let app = test_app().await;

    let response = app.oneshot(get("/health", None)).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "healthy");
    assert_eq!(body["services"]["vector_store"]["status"], "unhealthy");
}
