//! Mock session validator for testing.
//!
//! Implements the `SessionValidator` port without signing real tokens, so
//! router tests can act as a user, a staff member or an anonymous caller.
//!
//! # Example
//!
//! ```ignore
//! use shelter_sponsorships::adapters::auth::MockSessionValidator;
//!
//! let validator = MockSessionValidator::new()
//!     .with_test_user("user-token", "7")
//!     .with_staff("staff-token", "99");
//!
//! let user = validator.validate("user-token").await?;
//! assert!(!user.is_staff());
//! ```

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Mock session validator for testing.
///
/// Stores a map of tokens to principals. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a principal.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a user-account principal.
    ///
    /// Ids that fail validation are ignored, leaving the token invalid.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl AsRef<str>) -> Self {
        match UserId::new(user_id.as_ref()) {
            Ok(id) => {
                let mut user = AuthenticatedUser::user(id);
                user.email = Some(format!("{}@test.example.com", user_id.as_ref()));
                self.with_user(token, user)
            }
            Err(_) => self,
        }
    }

    /// Adds a valid token for a staff principal.
    pub fn with_staff(self, token: impl Into<String>, staff_id: impl AsRef<str>) -> Self {
        match UserId::new(staff_id.as_ref()) {
            Ok(id) => self.with_user(token, AuthenticatedUser::staff(id)),
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self
            .force_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
        self
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self
            .force_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
