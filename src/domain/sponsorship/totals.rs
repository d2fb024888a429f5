//! Per-account payment rollups.

use serde::Serialize;

use super::{Payment, PlanType};

/// Settled payment sums grouped by plan type, in minor currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SponsorshipTotals {
    pub total_one_time: i64,
    pub total_subscription: i64,
    pub total_all: i64,
}

impl SponsorshipTotals {
    /// Adds a payment if its status counts as settled.
    pub fn record(&mut self, plan_type: PlanType, payment: &Payment) {
        if !payment.status.is_settled() {
            return;
        }
        self.add_settled(plan_type, payment.amount.as_i64());
    }

    /// Adds an already-settled amount.
    pub fn add_settled(&mut self, plan_type: PlanType, amount: i64) {
        match plan_type {
            PlanType::OneTime => self.total_one_time += amount,
            PlanType::Subscription => self.total_subscription += amount,
        }
        self.total_all = self.total_one_time + self.total_subscription;
    }

    pub fn from_payments<'a>(payments: impl IntoIterator<Item = (PlanType, &'a Payment)>) -> Self {
        payments
            .into_iter()
            .fold(Self::default(), |mut totals, (plan, payment)| {
                totals.record(plan, payment);
                totals
            })
    }
}
