//! Connection settings for the sponsorship store.

use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on pooled connections.
pub const MAX_POOL_SIZE: u32 = 100;

/// Where the sponsorship tables live and how many connections to hold.
///
/// Every command runs in one short transaction, so the pool only needs a
/// size and an acquire timeout.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` URL.
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a free connection before failing.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Apply `migrations/` before serving.
    #[serde(default)]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Pool settings handed to `PgPoolOptions::connect` at startup.
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SHELTER__DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.max_connections == 0 || self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::InvalidPoolSize(self.max_connections));
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: false,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}
