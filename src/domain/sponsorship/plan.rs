//! Plan types and billing intervals.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

fn norm(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Whether a sponsorship is a single payment or a recurring commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanType {
    #[serde(rename = "one-time")]
    OneTime,
    #[serde(rename = "subscription")]
    Subscription,
}

impl PlanType {
    /// Parses request input. Accepts `one-time`, `one_time` and `one time`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match norm(raw).as_str() {
            "one-time" | "one_time" | "one time" => Ok(PlanType::OneTime),
            "subscription" => Ok(PlanType::Subscription),
            _ => Err(ValidationError::invalid_format(
                "plan_type",
                "must be one-time or subscription",
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::OneTime => "one-time",
            PlanType::Subscription => "subscription",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing cadence of a recurring subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingInterval {
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingInterval {
    /// Parses request input. `annually` is an alias of `yearly`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match norm(raw).as_str() {
            "monthly" => Ok(BillingInterval::Monthly),
            "quarterly" => Ok(BillingInterval::Quarterly),
            "yearly" | "annually" => Ok(BillingInterval::Yearly),
            _ => Err(ValidationError::invalid_format(
                "frequency",
                "must be monthly, quarterly or yearly",
            )),
        }
    }

    /// Reads a stored value. Unrecognised values bill monthly.
    pub fn from_stored(raw: &str) -> Self {
        Self::parse(raw).unwrap_or_else(|_| {
            tracing::warn!(interval = raw, "unknown stored billing interval, using monthly");
            BillingInterval::Monthly
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingInterval::Monthly => "monthly",
            BillingInterval::Quarterly => "quarterly",
            BillingInterval::Yearly => "yearly",
        }
    }

    /// Advances `from` by one interval using calendar arithmetic.
    ///
    /// Month-end days clamp to the last valid day of the target month.
    pub fn advance(&self, from: Timestamp) -> Timestamp {
        match self {
            BillingInterval::Monthly => from.add_months(1),
            BillingInterval::Quarterly => from.add_months(3),
            BillingInterval::Yearly => from.add_years(1),
        }
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
