//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Shortest HS256 secret accepted in production.
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// Authentication configuration (HS256 session tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared signing secret of the auth service
    pub jwt_secret: SecretString,

    /// Expected `iss` claim
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a secret of at least `MIN_PRODUCTION_SECRET_LEN`
    /// bytes.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_issuer.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_ISSUER"));
        }
        if *environment == Environment::Production && secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_LEN));
        }
        Ok(())
    }
}

fn default_jwt_issuer() -> String {
    "AuthService".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::new(secret.to_string()),
            jwt_issuer: default_jwt_issuer(),
        }
    }

    #[test]
    fn test_validation_missing_secret() {
        assert!(config("").validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_blank_issuer() {
        let config = AuthConfig {
            jwt_issuer: "  ".to_string(),
            ..config("dev-secret")
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_production_requires_long_secret() {
        let short = config("dev-secret");
        // Allowed in development
        assert!(short.validate(&Environment::Development).is_ok());
        // Rejected in production
        assert!(matches!(
            short.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(_))
        ));

        let long = config(&"x".repeat(MIN_PRODUCTION_SECRET_LEN));
        assert!(long.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_secret_is_redacted_in_debug_output() {
        let rendered = format!("{:?}", config("super-secret-value"));
        assert!(!rendered.contains("super-secret-value"));
    }
}
