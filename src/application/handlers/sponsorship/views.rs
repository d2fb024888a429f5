//! Read models shared by the listing queries.

use crate::domain::foundation::Timestamp;
use crate::domain::sponsorship::{BillingPeriod, Subscription};
use crate::ports::SponsorshipRecord;

/// A subscription with its derived billing dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionView {
    pub subscription: Subscription,
    pub current_period_end: Timestamp,
    /// Absent once the subscription is cancelled.
    pub next_payment_at: Option<Timestamp>,
}

impl SubscriptionView {
    pub fn from_record(record: &SponsorshipRecord) -> Option<Self> {
        let subscription = record.subscription.as_ref()?;
        let period = BillingPeriod::compute(&record.sponsorship, subscription, &record.payments);
        Some(Self {
            subscription: subscription.clone(),
            current_period_end: period.end,
            next_payment_at: subscription.is_active().then(|| period.next_payment_at()),
        })
    }
}
