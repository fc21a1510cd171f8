//! Authentication test helpers
//!
//! Provides utilities for creating test users, generating tokens,
//! and wiring follow edges.

use sqlx::SqlitePool;
use uuid::Uuid;

use socialhub::backend::auth::sessions::create_token;
use socialhub::backend::auth::users::{create_user, follow};
use socialhub::shared::AppConfig;

pub const TEST_PASSWORD: &str = "test_password_123";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    pub token: String,
}

/// Create a test user in the database
pub async fn create_test_user(pool: &SqlitePool, config: &AppConfig, username: &str) -> TestUser {
    let email = format!("{}@example.com", username);
    let password_hash =
        bcrypt::hash(TEST_PASSWORD, config.bcrypt_cost).expect("Failed to hash password");

    let user = create_user(pool, username, &email, username, None, &password_hash)
        .await
        .expect("Failed to create test user");

    let token = create_token(config, user.id, &user.email, &user.username)
        .expect("Failed to create test token");

    TestUser {
        id: user.id,
        username: user.username,
        email: user.email,
        password: TEST_PASSWORD.to_string(),
        token,
    }
}

/// Create a test user with a unique username
pub async fn create_unique_test_user(pool: &SqlitePool, config: &AppConfig) -> TestUser {
    let simple = Uuid::new_v4().simple().to_string();
    let username = format!("user_{}", &simple[..12]);
    create_test_user(pool, config, &username).await
}

/// Make `follower` follow `followee`
pub async fn make_follow(pool: &SqlitePool, follower: &TestUser, followee: &TestUser) {
    follow(pool, follower.id, followee.id)
        .await
        .expect("Failed to create follow edge");
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
