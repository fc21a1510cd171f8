/**
 * Server Initialization
 *
 * # Initialization Process
 *
 * 1. Open the database and run migrations
 * 2. Wire the services into `AppState`
 * 3. Create and configure the router
 */

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::connect_database;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create the Axum application for a configuration
///
/// # Errors
///
/// Fails if the database cannot be opened or migrated.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing socialhub backend server");

    let db_pool = connect_database(&config).await?;
    let app_state = AppState::new(config, db_pool);

    tracing::info!("Router configured");
    Ok(create_router(app_state))
}
