//! Sponsorship-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | PeriodEnded | 409 |
//! | ConcurrentModification | 409 |
//! | Infrastructure | 500 |

use thiserror::Error;

use crate::domain::foundation::{
    DomainError, ErrorCode, SubscriptionId, Timestamp, ValidationError,
};

/// Errors raised by sponsorship commands and queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SponsorshipError {
    /// Request input is missing or malformed.
    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    /// A referenced record does not exist or is not visible to the caller.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The caller may not perform this operation.
    #[error("{0}")]
    Forbidden(String),

    /// Reactivation attempted after the paid-through period elapsed.
    #[error("period ended, cannot reactivate subscription {subscription_id}")]
    PeriodEnded {
        subscription_id: SubscriptionId,
        period_end: Timestamp,
    },

    /// Another request changed the row between our read and our write.
    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    /// Persistence or other infrastructure failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl SponsorshipError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SponsorshipError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        SponsorshipError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        SponsorshipError::Forbidden(message.into())
    }

    pub fn period_ended(subscription_id: SubscriptionId, period_end: Timestamp) -> Self {
        SponsorshipError::PeriodEnded {
            subscription_id,
            period_end,
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SponsorshipError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SponsorshipError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SponsorshipError::NotFound { .. } => ErrorCode::NotFound,
            SponsorshipError::Forbidden(_) => ErrorCode::Forbidden,
            SponsorshipError::PeriodEnded { .. } => ErrorCode::PeriodEnded,
            SponsorshipError::ConcurrentModification(_) => ErrorCode::Conflict,
            SponsorshipError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for SponsorshipError {
    fn from(err: ValidationError) -> Self {
        SponsorshipError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for SponsorshipError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => SponsorshipError::ValidationFailed {
                field: err.details.get("field").cloned().unwrap_or_default(),
                message: err.message,
            },
            ErrorCode::NotFound => SponsorshipError::NotFound {
                resource: "record",
                id: err.details.get("id").cloned().unwrap_or_default(),
            },
            ErrorCode::Conflict => SponsorshipError::ConcurrentModification(err.message),
            ErrorCode::Forbidden | ErrorCode::Unauthorized => {
                SponsorshipError::Forbidden(err.message)
            }
            _ => SponsorshipError::Infrastructure(err.to_string()),
        }
    }
}
