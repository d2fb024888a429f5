//! Strongly-typed identifier value objects.
//!
//! Sponsorship rows use store-assigned integer keys. Ordering by id is
//! meaningful (the most recent payment is the one with the highest id), so
//! these are sequential integers rather than random UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw key, rejecting zero and negative values.
            pub fn new(raw: i64) -> Result<Self, ValidationError> {
                if raw <= 0 {
                    return Err(ValidationError::invalid_format(
                        $field,
                        "must be a positive integer",
                    ));
                }
                Ok(Self(raw))
            }

            /// Wraps a key read back from storage.
            pub(crate) fn from_row(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the inner integer.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::invalid_format($field, "must be an integer"))?;
                Self::new(raw)
            }
        }
    };
}

row_id!(
    /// Identifier of a sponsoring identity.
    SponsorId,
    "sponsor_id"
);
row_id!(
    /// Identifier of a sponsorship commitment.
    SponsorshipId,
    "sponsorship_id"
);
row_id!(
    /// Identifier of a recurring subscription.
    SubscriptionId,
    "subscription_id"
);
row_id!(
    /// Identifier of a ledger row.
    PaymentId,
    "payment_id"
);
row_id!(
    /// Identifier of a dog, owned by the animal records service.
    DogId,
    "dog_id"
);
row_id!(
    /// Identifier of a payment method lookup row.
    PaymentMethodId,
    "payment_method_id"
);
row_id!(
    /// Identifier of a gender lookup row.
    GenderId,
    "gender_id"
);

/// Account identifier (typically from auth provider).
///
/// Used for both user accounts and staff accounts; which one it is comes
/// from the authenticated principal's kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
