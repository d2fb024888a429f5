//! Listener settings for the sponsorship API.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

/// Longest request timeout accepted, in seconds.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Bind address, request timeout and log settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Production switches logs to JSON and enforces a long token secret.
    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Applied to every route by the timeout layer.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| ValidationError::InvalidListenAddress(raw))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,shelter_sponsorships=debug,sqlx=warn,tower_http=info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_all_interfaces() {
        let config = ServerConfig::default();

        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(!config.is_production());
        assert!(config.log_level.contains("shelter_sponsorships=debug"));
    }

    #[test]
    fn hostname_that_is_not_an_ip_is_rejected() {
        let config = ServerConfig {
            host: "shelter.local".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidListenAddress(addr)) if addr == "shelter.local:8080"
        ));
    }

    #[test]
    fn port_zero_is_rejected() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidPort)));
    }

    #[test]
    fn request_timeout_must_be_between_one_second_and_the_cap() {
        for secs in [0, MAX_REQUEST_TIMEOUT_SECS + 1] {
            let config = ServerConfig {
                request_timeout_secs: secs,
                ..Default::default()
            };
            assert!(matches!(config.validate(), Err(ValidationError::InvalidTimeout)));
        }

        let config = ServerConfig {
            request_timeout_secs: MAX_REQUEST_TIMEOUT_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_reads_lowercase_names() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
        assert!(serde_json::from_str::<Environment>("\"staging\"").is_err());
    }
}
