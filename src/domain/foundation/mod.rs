//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the sponsorship domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser, PrincipalKind};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    DogId, GenderId, PaymentId, PaymentMethodId, SponsorId, SponsorshipId, SubscriptionId,
    UserId,
};
pub use timestamp::Timestamp;
