//! Authentication types for the domain layer.
//!
//! These types represent an authenticated principal extracted from a bearer
//! token. They have **no external dependencies**; the `SessionValidator` port
//! populates them.
//!
//! The shelter issues tokens to two kinds of principal: adopters/donors
//! (`user`) and shelter staff (`staff`). Only `user` principals own
//! sponsorships; only `staff` principals may use the admin endpoints.

use super::UserId;
use thiserror::Error;

/// Kind of principal carried by a session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Staff,
}

impl PrincipalKind {
    /// Maps the token's `kind` claim. Anything other than `staff` is a user.
    pub fn from_claim(kind: Option<&str>) -> Self {
        match kind.map(|k| k.trim().to_ascii_lowercase()) {
            Some(k) if k == "staff" => PrincipalKind::Staff,
            _ => PrincipalKind::User,
        }
    }
}

/// Authenticated principal extracted from a validated token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The account identifier from the token's `id` claim.
    pub id: UserId,

    /// Whether this is a user account or a staff account.
    pub kind: PrincipalKind,

    /// Username claim, if present.
    pub username: Option<String>,

    /// Email claim, if present.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a user-account principal.
    pub fn user(id: UserId) -> Self {
        Self {
            id,
            kind: PrincipalKind::User,
            username: None,
            email: None,
        }
    }

    /// Creates a staff principal.
    pub fn staff(id: UserId) -> Self {
        Self {
            id,
            kind: PrincipalKind::Staff,
            username: None,
            email: None,
        }
    }

    /// The account that owns sponsorships, if this principal is a user.
    ///
    /// Staff sessions never act as a sponsoring account.
    pub fn account_id(&self) -> Option<&UserId> {
        match self.kind {
            PrincipalKind::User => Some(&self.id),
            PrincipalKind::Staff => None,
        }
    }

    /// The staff identifier, if this principal is staff.
    pub fn staff_id(&self) -> Option<&UserId> {
        match self.kind {
            PrincipalKind::Staff => Some(&self.id),
            PrincipalKind::User => None,
        }
    }

    pub fn is_staff(&self) -> bool {
        self.kind == PrincipalKind::Staff
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_claim_is_case_insensitive() {
        assert_eq!(PrincipalKind::from_claim(Some(" Staff ")), PrincipalKind::Staff);
        assert_eq!(PrincipalKind::from_claim(Some("user")), PrincipalKind::User);
        assert_eq!(PrincipalKind::from_claim(None), PrincipalKind::User);
    }

    #[test]
    fn staff_principal_has_no_sponsoring_account() {
        let staff = AuthenticatedUser::staff(UserId::new("9").unwrap());
        assert!(staff.account_id().is_none());
        assert_eq!(staff.staff_id().map(|s| s.as_str()), Some("9"));

        let user = AuthenticatedUser::user(UserId::new("4").unwrap());
        assert_eq!(user.account_id().map(|s| s.as_str()), Some("4"));
        assert!(user.staff_id().is_none());
    }
}
