//! Session validation port.
//!
//! Sessions are issued by the shelter's auth service; this service only
//! verifies them. Implementations exist for HS256 JWTs and for tests.
//!
//! # Security Requirements
//!
//! All implementations MUST validate:
//! - **Signature**: Token is signed with the shared secret
//! - **Issuer (iss)**: Token must come from the expected auth service
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts the principal.
///
/// HTTP middleware uses this to validate Bearer tokens.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
