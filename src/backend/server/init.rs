//! Server Initialization
//!
//! This module handles the setup of the Axum HTTP server: database pool,
//! migrations, admin provisioning, state assembly, and router creation.
//!
//! # Initialization Process
//!
//! 1. Connect the PostgreSQL pool (required — this is an API server)
//! 2. Run migrations; failures are logged but do not abort startup, since
//!    the schema may already be in place
//! 3. Provision the bootstrap admin account when configured
//! 4. Assemble [`AppState`] and the router

use axum::Router;
use sqlx::PgPool;

use crate::backend::error::ApiError;
use crate::backend::routes::create_router;
use crate::backend::server::bootstrap::provision_admin;
use crate::backend::server::config::AppConfig;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router<()>, ApiError> {
    tracing::info!("Initializing Art Corner backend server");

    tracing::info!("Connecting to database...");
    let db_pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| ApiError::internal(format!("database connection failed: {}", e)))?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&db_pool).await {
        Ok(_) => tracing::info!("Database migrations completed"),
        Err(e) => {
            // schema may already exist from an earlier deployment
            tracing::error!("Failed to run database migrations: {:?}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    if let Some(bootstrap) = &config.admin_bootstrap {
        if let Err(e) = provision_admin(&db_pool, bootstrap).await {
            tracing::error!("Admin provisioning failed: {:?}", e);
        }
    }

    let app_state = AppState::new(config, db_pool);
    let app = create_router(app_state);

    tracing::info!("Router configured");
    Ok(app)
}
