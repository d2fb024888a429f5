//! Subscription entity - the recurring side of a sponsorship.

use serde::Serialize;

use crate::domain::foundation::{SponsorshipId, SubscriptionId, Timestamp};

use super::{Amount, BillingInterval, SubscriptionStatus};

/// Fields for inserting a subscription row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub sponsorship_id: SponsorshipId,
    pub amount: Amount,
    pub interval: BillingInterval,
    pub start_date: Timestamp,
}

/// A persisted recurring subscription.
///
/// Exactly one exists per `subscription`-plan sponsorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub sponsorship_id: SponsorshipId,
    /// Mirrors the sponsorship amount.
    pub amount: Amount,
    /// Immutable after creation.
    pub interval: BillingInterval,
    pub status: SubscriptionStatus,
    pub start_date: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    /// Optimistic concurrency counter, bumped by the store on every update.
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Cancels the subscription.
    ///
    /// When `at_period_end` is false the subscription ends immediately.
    pub fn cancel(&mut self, at_period_end: bool, now: Timestamp) {
        self.status = SubscriptionStatus::Cancelled;
        self.cancel_at_period_end = at_period_end;
        self.cancelled_at = Some(now);
        self.ended_at = if at_period_end { None } else { Some(now) };
        self.updated_at = now;
    }

    /// Reactivates the subscription, clearing cancellation markers.
    ///
    /// Callers must check the billing period first.
    pub fn reactivate(&mut self, cancel_at_period_end: bool, now: Timestamp) {
        self.status = SubscriptionStatus::Active;
        self.cancel_at_period_end = cancel_at_period_end;
        self.cancelled_at = None;
        self.ended_at = None;
        self.updated_at = now;
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn active_subscription(interval: BillingInterval, start: Timestamp) -> Subscription {
        Subscription {
            id: SubscriptionId::from_row(1),
            sponsorship_id: SponsorshipId::from_row(1),
            amount: Amount::from_row(1000),
            interval,
            status: SubscriptionStatus::Active,
            start_date: Some(start),
            cancelled_at: None,
            ended_at: None,
            cancel_at_period_end: false,
            version: 1,
            created_at: start,
            updated_at: start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::active_subscription;
    use super::*;

    #[test]
    fn cancel_at_period_end_leaves_end_unset() {
        let start = Timestamp::now();
        let mut sub = active_subscription(BillingInterval::Monthly, start);
        let now = start.add_days(3);

        sub.cancel(true, now);

        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.cancelled_at, Some(now));
        assert_eq!(sub.ended_at, None);
    }

    #[test]
    fn immediate_cancel_sets_end() {
        let start = Timestamp::now();
        let mut sub = active_subscription(BillingInterval::Monthly, start);
        let now = start.add_days(3);

        sub.cancel(false, now);

        assert_eq!(sub.ended_at, Some(now));
        assert!(!sub.cancel_at_period_end);
    }

    #[test]
    fn reactivate_clears_cancellation_markers() {
        let start = Timestamp::now();
        let mut sub = active_subscription(BillingInterval::Quarterly, start);
        sub.cancel(false, start.add_days(1));

        sub.reactivate(false, start.add_days(2));

        assert!(sub.is_active());
        assert_eq!(sub.cancelled_at, None);
        assert_eq!(sub.ended_at, None);
        assert_eq!(sub.interval, BillingInterval::Quarterly);
    }
}
