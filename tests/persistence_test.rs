//! Repository tests against a real migrated SQLite database.
//!
//! Covers the schema rules the stores rely on: foreign-key cascades,
//! set-null on user deletion, idempotent configuration upserts, and
//! audit log ordering.

use chrono::Utc;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;

use text2sql::domain::{ConfigEntry, NewAuditLog, ValueType};
use text2sql::infra::repositories::{
    AuditFilter, AuditRepository, AuditStore, ConfigRepository, ConfigStore, MappingRepository,
    MappingStore, NewDocument, UserRepository, UserStore,
};
use text2sql::infra::Migrator;
use text2sql::types::PaginationParams;

struct TestDb {
    _dir: TempDir,
    conn: DatabaseConnection,
}

/// Migrated file-backed database on a single connection so PRAGMAs stick.
async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("app.sqlite").display()
    );

    let mut options = ConnectOptions::new(url);
    options.max_connections(1);
    let conn = SeaDatabase::connect(options).await.expect("connect");

    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_string(),
    ))
    .await
    .expect("enable foreign keys");

    Migrator::up(&conn, None).await.expect("migrations");
    TestDb { _dir: dir, conn }
}

fn page(per_page: u64) -> PaginationParams {
    PaginationParams { page: 1, per_page }
}

fn llm_model_entry(value: &str) -> ConfigEntry {
    ConfigEntry {
        key: "llm.model".to_string(),
        value: value.to_string(),
        value_type: ValueType::String,
        category: "llm".to_string(),
        sensitive: false,
        description: String::new(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn config_upsert_is_idempotent() {
    let db = test_db().await;
    let configs = ConfigStore::new(db.conn.clone());

    configs
        .upsert(llm_model_entry("gpt-4o"))
        .await
        .expect("first upsert");
    configs
        .upsert(llm_model_entry("gpt-4o"))
        .await
        .expect("second upsert");

    let entries = configs.list().await.expect("list");
    let rows = entries.iter().filter(|e| e.key == "llm.model").count();
    assert_eq!(rows, 1);

    configs
        .upsert(llm_model_entry("o3-mini"))
        .await
        .expect("overwrite");
    let fetched = configs
        .get("llm.model")
        .await
        .expect("get")
        .expect("entry exists");
    assert_eq!(fetched.value, "o3-mini");
}

#[tokio::test]
async fn deleting_a_project_removes_its_documents() {
    let db = test_db().await;
    let users = UserStore::new(db.conn.clone());
    let mappings = MappingStore::new(db.conn.clone());

    let owner = users
        .create(
            "pm".to_string(),
            "pm@example.com".to_string(),
            "hash".to_string(),
            vec![],
        )
        .await
        .expect("create user");
    let project = mappings
        .create_project("crm-import".to_string(), String::new(), owner.id)
        .await
        .expect("create project");
    let document = mappings
        .insert_document(NewDocument {
            project_id: project.id,
            filename: "fields.csv".to_string(),
            stored_path: "stored/fields.csv".to_string(),
            content_type: "text/csv".to_string(),
            size_bytes: 42,
            uploader_id: Some(owner.id),
        })
        .await
        .expect("insert document");

    mappings
        .delete_project(project.id)
        .await
        .expect("delete project");

    let found = mappings
        .find_document(document.id)
        .await
        .expect("find document");
    assert!(found.is_none());
}

#[tokio::test]
async fn deleting_a_user_nulls_dependent_rows() {
    let db = test_db().await;
    let users = UserStore::new(db.conn.clone());
    let mappings = MappingStore::new(db.conn.clone());
    let audits = AuditStore::new(db.conn.clone());

    let user = users
        .create(
            "uploader".to_string(),
            "uploader@example.com".to_string(),
            "hash".to_string(),
            vec![],
        )
        .await
        .expect("create user");
    let project = mappings
        .create_project("erp-export".to_string(), String::new(), user.id)
        .await
        .expect("create project");
    let document = mappings
        .insert_document(NewDocument {
            project_id: project.id,
            filename: "schema.txt".to_string(),
            stored_path: "stored/schema.txt".to_string(),
            content_type: "text/plain".to_string(),
            size_bytes: 7,
            uploader_id: Some(user.id),
        })
        .await
        .expect("insert document");
    audits
        .insert(NewAuditLog::new("mapping.upload").user(user.id, "uploader"))
        .await
        .expect("insert audit");

    users.delete(user.id).await.expect("delete user");

    let document = mappings
        .find_document(document.id)
        .await
        .expect("find document")
        .expect("document survives");
    assert_eq!(document.uploader_id, None);

    let project = mappings
        .find_project(project.id)
        .await
        .expect("find project")
        .expect("project survives");
    assert_eq!(project.owner_id, None);

    let (logs, _) = audits
        .list(&AuditFilter::default(), &page(10))
        .await
        .expect("list audit");
    assert_eq!(logs[0].user_id, None);
    assert_eq!(logs[0].username, "uploader");
}

#[tokio::test]
async fn audit_log_lists_newest_first_and_filters_by_action() {
    let db = test_db().await;
    let audits = AuditStore::new(db.conn.clone());

    for action in ["login", "query.run", "config.upsert"] {
        audits
            .insert(NewAuditLog::new(action))
            .await
            .expect("insert audit");
    }

    let (logs, total) = audits
        .list(&AuditFilter::default(), &page(10))
        .await
        .expect("list all");
    assert_eq!(total, 3);
    let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(actions, vec!["config.upsert", "query.run", "login"]);

    let filter = AuditFilter {
        action: Some("query.run".to_string()),
        ..Default::default()
    };
    let (logs, total) = audits.list(&filter, &page(10)).await.expect("list filtered");
    assert_eq!(total, 1);
    assert_eq!(logs[0].action, "query.run");
}
