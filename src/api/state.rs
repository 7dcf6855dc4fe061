//! Application state - Dependency injection container.
//!
//! Handlers reach every service through the container; infrastructure
//! handles (database, vector client) stay available for health checks.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::infra::{Database, VectorStoreClient};
use crate::services::{ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Service container
    pub services: Arc<dyn ServiceContainer>,
    /// Application database connection
    pub database: Arc<Database>,
    /// Vector microservice client (health checks)
    pub vector: VectorStoreClient,
}

impl AppState {
    /// Create application state from live connections and config.
    ///
    /// `target_db` is the database that generated SQL executes against;
    /// it may be the application database itself.
    pub fn from_config(
        database: Arc<Database>,
        target_db: DatabaseConnection,
        config: Config,
    ) -> Self {
        let vector = VectorStoreClient::new(config.vector_service_url.clone());
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            target_db,
            config,
        ));

        Self {
            services,
            database,
            vector,
        }
    }

    /// Create application state with a manually injected container.
    ///
    /// Intended for tests that stub out the service layer.
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Arc<Database>,
        vector: VectorStoreClient,
    ) -> Self {
        Self {
            services,
            database,
            vector,
        }
    }
}
