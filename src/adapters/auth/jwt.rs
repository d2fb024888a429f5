//! HS256 JWT adapter for session validation.
//!
//! Tokens are issued by the shelter's auth service and signed with a shared
//! secret. This adapter validates them by:
//!
//! 1. Verifying the HS256 signature against the shared secret
//! 2. Validating the issuer and expiry claims
//! 3. Mapping the `ID` and `kind` claims to a domain `AuthenticatedUser`
//!
//! # Example
//!
//! ```ignore
//! use shelter_sponsorships::adapters::auth::JwtSessionValidator;
//!
//! let validator = JwtSessionValidator::from_config(&config.auth);
//! let user = validator.validate("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, PrincipalKind, UserId};
use crate::ports::SessionValidator;

/// Claims carried by shelter session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account or staff identifier.
    #[serde(rename = "ID", alias = "id")]
    pub id: ClaimId,

    /// `user` or `staff`. Missing means user.
    #[serde(default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    /// Expiry timestamp (Unix epoch seconds)
    pub exp: i64,

    pub iss: String,
}

/// The id claim is numeric in tokens from the auth service but a string in
/// some older tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimId {
    Number(u64),
    Text(String),
}

impl ClaimId {
    fn to_user_id(&self) -> Option<UserId> {
        match self {
            ClaimId::Number(0) => None,
            ClaimId::Number(n) => UserId::new(n.to_string()).ok(),
            ClaimId::Text(s) => UserId::new(s.trim()).ok(),
        }
    }
}

/// Session validator for HS256 tokens signed with a shared secret.
pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtSessionValidator {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.jwt_secret.expose_secret().as_bytes(),
            config.jwt_issuer.clone(),
        )
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    ErrorKind::InvalidIssuer => {
                        tracing::warn!("Invalid issuer in token");
                        AuthError::InvalidToken
                    }
                    _ => {
                        tracing::warn!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })?;
        let claims = token_data.claims;

        let id = claims.id.to_user_id().ok_or_else(|| {
            tracing::warn!("Token carries an unusable id claim");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser {
            id,
            kind: PrincipalKind::from_claim(claims.kind.as_deref()),
            username: claims.username.filter(|u| !u.is_empty()),
            email: claims.email.filter(|e| !e.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";
    const ISSUER: &str = "AuthService";

    fn sign(claims: serde_json::Value, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn validator() -> JwtSessionValidator {
        JwtSessionValidator::new(SECRET, ISSUER)
    }

    #[tokio::test]
    async fn numeric_id_without_kind_is_a_user() {
        let token = sign(
            json!({ "ID": 7, "username": "noi", "email": "noi@example.com", "exp": in_one_hour(), "iss": ISSUER }),
            SECRET,
        );

        let user = validator().validate(&token).await.unwrap();

        assert_eq!(user.id.as_str(), "7");
        assert_eq!(user.kind, PrincipalKind::User);
        assert_eq!(user.email.as_deref(), Some("noi@example.com"));
    }

    #[tokio::test]
    async fn staff_kind_yields_staff_principal() {
        let token = sign(
            json!({ "ID": 3, "kind": "staff", "exp": in_one_hour(), "iss": ISSUER }),
            SECRET,
        );

        let user = validator().validate(&token).await.unwrap();

        assert!(user.is_staff());
        assert_eq!(user.staff_id().map(|s| s.as_str()), Some("3"));
    }

    #[tokio::test]
    async fn lowercase_string_id_is_accepted() {
        let token = sign(
            json!({ "id": "42", "exp": in_one_hour(), "iss": ISSUER }),
            SECRET,
        );

        let user = validator().validate(&token).await.unwrap();

        assert_eq!(user.id.as_str(), "42");
    }

    #[tokio::test]
    async fn expired_token_is_reported_as_expired() {
        let token = sign(
            json!({ "ID": 7, "exp": chrono::Utc::now().timestamp() - 3600, "iss": ISSUER }),
            SECRET,
        );

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid() {
        let token = sign(
            json!({ "ID": 7, "exp": in_one_hour(), "iss": "Elsewhere" }),
            SECRET,
        );

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let token = sign(
            json!({ "ID": 7, "exp": in_one_hour(), "iss": ISSUER }),
            b"another-secret",
        );

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn zero_id_is_invalid() {
        let token = sign(json!({ "ID": 0, "exp": in_one_hour(), "iss": ISSUER }), SECRET);

        let result = validator().validate(&token).await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let result = validator().validate("not-a-jwt").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
