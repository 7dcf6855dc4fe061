//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Initialize application database (runs migrations)
    let db = Arc::new(Database::connect(&config).await);
    tracing::info!("Database connected");

    // The target database that generated SQL runs against; falls back to
    // the application database when not configured separately.
    let target_db = match &config.target_database_url {
        Some(url) => sea_orm::Database::connect(url)
            .await
            .map_err(|e| AppError::internal(format!("Target database connection failed: {}", e)))?,
        None => db.get_connection(),
    };

    // Create application state with centralized service container
    let app_state = AppState::from_config(db, target_db, config);

    // Build router
    let app = create_router(app_state);

    // Start server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
