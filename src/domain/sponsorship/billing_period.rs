//! Billing period arithmetic.
//!
//! Periods are computed lazily from the subscription's anchor; nothing
//! schedules charges. These functions are the only source for reactivation
//! eligibility and the quoted next payment date.

use serde::Serialize;

use crate::domain::foundation::Timestamp;

use super::{BillingInterval, Payment, PaymentStatus, Sponsorship, Subscription};

/// Advances `from` by one billing interval.
pub fn add_interval(from: Timestamp, interval: BillingInterval) -> Timestamp {
    interval.advance(from)
}

/// Start of the current billing period.
///
/// The most recent (highest id) succeeded payment for the subscription wins;
/// otherwise the subscription start date, otherwise the sponsorship creation
/// time.
pub fn period_anchor(
    sponsorship: &Sponsorship,
    subscription: &Subscription,
    payments: &[Payment],
) -> Timestamp {
    let latest_succeeded = payments
        .iter()
        .filter(|p| {
            p.subscription_id == Some(subscription.id) && p.status == PaymentStatus::Succeeded
        })
        .max_by_key(|p| p.id);

    match latest_succeeded {
        Some(payment) => payment.created_at,
        None => subscription.start_date.unwrap_or(sponsorship.created_at),
    }
}

/// End of the current billing period.
pub fn current_period_end(
    sponsorship: &Sponsorship,
    subscription: &Subscription,
    payments: &[Payment],
) -> Timestamp {
    add_interval(period_anchor(sponsorship, subscription, payments), subscription.interval)
}

/// The current period of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingPeriod {
    pub anchor: Timestamp,
    pub end: Timestamp,
}

impl BillingPeriod {
    pub fn compute(sponsorship: &Sponsorship, subscription: &Subscription, payments: &[Payment]) -> Self {
        let anchor = period_anchor(sponsorship, subscription, payments);
        Self {
            anchor,
            end: add_interval(anchor, subscription.interval),
        }
    }

    /// Whether `now` is strictly past the period end.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now.is_after(&self.end)
    }

    /// The next charge date quoted to the sponsor.
    pub fn next_payment_at(&self) -> Timestamp {
        self.end
    }
}
