/**
 * Database Setup
 *
 * Opens the SQLite pool named by `AppConfig::database_url` and runs the
 * embedded migrations from `migrations/`.
 *
 * # In-memory Databases
 *
 * Every connection to `sqlite::memory:` sees its own database, so memory
 * URLs get a single connection that is never recycled.
 */

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::backend::error::BackendError;
use crate::shared::AppConfig;

const MAX_CONNECTIONS: u32 = 8;

/// Connect to the configured database and bring its schema up to date
///
/// # Errors
///
/// * `DatabaseError` - the URL is invalid or the file cannot be opened
/// * `Internal` - a migration failed
pub async fn connect_database(config: &AppConfig) -> Result<SqlitePool, BackendError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    tracing::info!("Connecting to database {}", config.database_url);

    let pool = if is_memory_url(&config.database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?
    };

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), BackendError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        BackendError::internal(format!("Migration failed: {}", e))
    })?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
