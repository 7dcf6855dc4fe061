//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

const DEFAULT_DATABASE_URL: &str = "sqlite://text2sql.db?mode=rwc";
const DEFAULT_VECTOR_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_UPLOAD_ROOT: &str = "uploads";

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Application SQLite database (users, roles, audit, metadata...)
    pub database_url: String,
    /// Target database that generated SQL runs against. Defaults to the
    /// application database when unset.
    pub target_database_url: Option<String>,
    /// Base URL of the ChromaDB REST microservice
    pub vector_service_url: String,
    /// Root directory for uploaded mapping documents
    pub upload_root: PathBuf,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("target_database_url", &"[REDACTED]")
            .field("vector_service_url", &self.vector_service_url)
            .field("upload_root", &self.upload_root)
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if JWT_SECRET is not set or is too short (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            target_database_url: env::var("TARGET_DATABASE_URL").ok(),
            vector_service_url: env::var("VECTOR_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_VECTOR_URL.to_string()),
            upload_root: env::var("UPLOAD_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_ROOT)),
            jwt_secret,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
