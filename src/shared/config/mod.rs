//! Application configuration module
//!
//! `AppConfig` is assembled either through `AppConfigBuilder` (tests, embedding)
//! or from the process environment with `AppConfig::from_env()`.
//!
//! # Environment
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite://socialhub.db` |
//! | `SERVER_PORT` | `3000` |
//! | `APP_URL` | `http://localhost:3000` |
//! | `JWT_SECRET` | development secret (logged as a warning) |
//! | `TOKEN_TTL_SECS` | `86400` |
//! | `BCRYPT_COST` | `bcrypt::DEFAULT_COST` |

use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://socialhub.db";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx SQLite connection URL
    pub database_url: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// Public base URL used to build invite links
    pub app_url: String,
    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Bearer token lifetime
    pub token_ttl_secs: u64,
    /// bcrypt work factor for account and room passwords
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            app_url: DEFAULT_APP_URL.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults; set but unparsable
    /// variables are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();

        if let Ok(url) = std::env::var("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &port)?);
        }
        if let Ok(url) = std::env::var("APP_URL") {
            builder = builder.app_url(url);
        }
        match std::env::var("JWT_SECRET") {
            Ok(secret) => builder = builder.jwt_secret(secret),
            Err(_) => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }
        if let Ok(ttl) = std::env::var("TOKEN_TTL_SECS") {
            builder = builder.token_ttl_secs(parse_var("TOKEN_TTL_SECS", &ttl)?);
        }
        if let Ok(cost) = std::env::var("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &cost)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if !(self.app_url.starts_with("http://") || self.app_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.app_url.clone()));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TOKEN_TTL_SECS",
                value: "0".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        Ok(())
    }

    /// Invite URL for a token: `{app_url}/join/{token}`
    pub fn invite_link(&self, token: &str) -> String {
        format!("{}/join/{}", self.app_url.trim_end_matches('/'), token)
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    app_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_secs: Option<u64>,
    bcrypt_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn token_ttl_secs(mut self, ttl: u64) -> Self {
        self.token_ttl_secs = Some(ttl);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            port: self.port.unwrap_or(defaults.port),
            app_url: self.app_url.unwrap_or(defaults.app_url),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            token_ttl_secs: self.token_ttl_secs.unwrap_or(defaults.token_ttl_secs),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_builder_defaults() {
        let config = AppConfig::builder().build().unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.app_url, "http://localhost:3000");
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        let result = AppConfig::builder().bcrypt_cost(3).build();
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "BCRYPT_COST", .. }));
    }

    #[test]
    fn test_app_url_must_be_http() {
        let result = AppConfig::builder().app_url("localhost:3000").build();
        assert_matches!(result, Err(ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn test_invite_link_trims_trailing_slash() {
        let config = AppConfig::builder()
            .app_url("https://social.example/")
            .build()
            .unwrap();
        assert_eq!(config.invite_link("abc"), "https://social.example/join/abc");
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let result: Result<u16, _> = parse_var("SERVER_PORT", "eighty");
        assert_matches!(result, Err(ConfigError::InvalidValue { key: "SERVER_PORT", .. }));
    }
}
