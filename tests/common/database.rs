//! Database test fixtures
//!
//! Every fixture owns a private in-memory SQLite database with the
//! migrations applied, so tests never share state.

use sqlx::SqlitePool;

use socialhub::backend::server::connect_database;
use socialhub::shared::AppConfig;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// Configuration for tests: in-memory database and the cheapest bcrypt cost
pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .database_url("sqlite::memory:")
        .app_url("http://localhost:3000")
        .jwt_secret(TEST_JWT_SECRET)
        .bcrypt_cost(4)
        .build()
        .expect("Failed to build test config")
}

/// Test database fixture
pub struct TestDatabase {
    pool: SqlitePool,
    config: AppConfig,
}

impl TestDatabase {
    /// Create a fresh migrated database
    pub async fn new() -> Self {
        let config = test_config();
        let pool = connect_database(&config)
            .await
            .expect("Failed to create test database");
        Self { pool, config }
    }

    /// Get the database pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
