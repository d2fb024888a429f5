//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `SHELTER` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use shelter_sponsorships::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! config.validate()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod auth;
mod database;
mod error;
mod server;

pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_LEN};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Session token configuration
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `SHELTER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SHELTER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SHELTER__DATABASE__URL=...` -> `database.url = ...`
    /// - `SHELTER__AUTH__JWT_SECRET=...` -> `auth.jwt_secret = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SHELTER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("SHELTER__DATABASE__URL", "postgresql://test@localhost/shelter");
        env::set_var("SHELTER__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        env::remove_var("SHELTER__DATABASE__URL");
        env::remove_var("SHELTER__AUTH__JWT_SECRET");
        env::remove_var("SHELTER__AUTH__JWT_ISSUER");
        env::remove_var("SHELTER__SERVER__PORT");
        env::remove_var("SHELTER__SERVER__ENVIRONMENT");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/shelter");
        assert_eq!(config.auth.jwt_secret.expose_secret(), "dev-secret");
        assert_eq!(config.auth.jwt_issuer, "AuthService");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().validate().is_ok());
    }

    #[test]
    fn test_missing_secret_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SHELTER__DATABASE__URL", "postgresql://test@localhost/shelter");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    fn test_server_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
    }

    #[test]
    fn test_production_rejects_short_secret() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SHELTER__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_custom_server_port_and_issuer() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("SHELTER__SERVER__PORT", "3000");
        env::set_var("SHELTER__AUTH__JWT_ISSUER", "ShelterAuth");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.jwt_issuer, "ShelterAuth");
    }
}
