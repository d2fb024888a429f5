//! Status enums for sponsorships, subscriptions and ledger rows.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Lifecycle status of a sponsorship.
///
/// Overrides outside the known set are kept lower-cased in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SponsorshipStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
    Other(String),
}

impl SponsorshipStatus {
    /// Normalizes a client-supplied status override.
    ///
    /// Blank input yields `fallback`. `paid`, `paided` and `complete` are
    /// treated as `completed`, `canceled` as `cancelled`. Anything else is
    /// kept verbatim, trimmed and lower-cased.
    pub fn normalize(raw: Option<&str>, fallback: SponsorshipStatus) -> Self {
        let value = raw.map(|r| r.trim().to_lowercase()).unwrap_or_default();
        match value.as_str() {
            "" => fallback,
            "pending" => SponsorshipStatus::Pending,
            "active" => SponsorshipStatus::Active,
            "paid" | "paided" | "complete" | "completed" => SponsorshipStatus::Completed,
            "cancelled" | "canceled" => SponsorshipStatus::Cancelled,
            _ => SponsorshipStatus::Other(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SponsorshipStatus::Pending => "pending",
            SponsorshipStatus::Active => "active",
            SponsorshipStatus::Completed => "completed",
            SponsorshipStatus::Cancelled => "cancelled",
            SponsorshipStatus::Other(value) => value,
        }
    }

    /// Reads a stored value.
    pub fn from_stored(raw: &str) -> Self {
        Self::normalize(Some(raw), SponsorshipStatus::Pending)
    }
}

impl Serialize for SponsorshipStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SponsorshipStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_stored(&raw))
    }
}

impl From<SubscriptionStatus> for SponsorshipStatus {
    fn from(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Active => SponsorshipStatus::Active,
            SubscriptionStatus::Cancelled => SponsorshipStatus::Cancelled,
        }
    }
}

impl fmt::Display for SponsorshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a recurring subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_stored(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "cancelled" | "canceled" => Ok(SubscriptionStatus::Cancelled),
            _ => Err(ValidationError::invalid_format(
                "status",
                "must be active or cancelled",
            )),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
    Pending,
    Paid,
    Completed,
}

impl PaymentStatus {
    /// Whether the amount counts towards sponsorship totals.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Succeeded | PaymentStatus::Paid | PaymentStatus::Completed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Succeeded => "SUCCEEDED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_stored(raw: &str) -> Result<Self, ValidationError> {
        match raw.trim().to_uppercase().as_str() {
            "SUCCEEDED" => Ok(PaymentStatus::Succeeded),
            "FAILED" => Ok(PaymentStatus::Failed),
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            "COMPLETED" => Ok(PaymentStatus::Completed),
            _ => Err(ValidationError::invalid_format("status", "unknown payment status")),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_override_uses_fallback() {
        assert_eq!(
            SponsorshipStatus::normalize(None, SponsorshipStatus::Completed),
            SponsorshipStatus::Completed
        );
        assert_eq!(
            SponsorshipStatus::normalize(Some("  "), SponsorshipStatus::Active),
            SponsorshipStatus::Active
        );
    }

    #[test]
    fn paid_spellings_normalize_to_completed() {
        for raw in ["paid", "PAIDED", "complete", "Completed"] {
            assert_eq!(
                SponsorshipStatus::normalize(Some(raw), SponsorshipStatus::Active),
                SponsorshipStatus::Completed,
                "{raw}"
            );
        }
    }

    #[test]
    fn unknown_override_is_kept_lower_cased() {
        let status = SponsorshipStatus::normalize(Some(" Pending-Review "), SponsorshipStatus::Active);

        assert_eq!(status, SponsorshipStatus::Other("pending-review".to_string()));
        assert_eq!(status.as_str(), "pending-review");
        assert_eq!(SponsorshipStatus::from_stored("pending-review"), status);
    }

    #[test]
    fn sponsorship_status_serializes_as_its_stored_string() {
        assert_eq!(
            serde_json::to_string(&SponsorshipStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&SponsorshipStatus::Other("on-hold".to_string())).unwrap(),
            "\"on-hold\""
        );
    }

    #[test]
    fn only_succeeded_paid_completed_are_settled() {
        assert!(PaymentStatus::Succeeded.is_settled());
        assert!(PaymentStatus::Paid.is_settled());
        assert!(PaymentStatus::Completed.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
        assert!(!PaymentStatus::Pending.is_settled());
    }

    #[test]
    fn payment_status_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Succeeded).unwrap(),
            "\"SUCCEEDED\""
        );
    }

    #[test]
    fn subscription_status_mirrors_onto_sponsorship() {
        assert_eq!(
            SponsorshipStatus::from(SubscriptionStatus::Cancelled),
            SponsorshipStatus::Cancelled
        );
    }
}
