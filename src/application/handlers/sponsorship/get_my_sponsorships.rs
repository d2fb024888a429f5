//! GetMySponsorshipsHandler - Query handler for the sponsor's own page.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::sponsorship::{Payment, Sponsorship, SponsorshipError, SponsorshipTotals};
use crate::ports::{DogSummary, SponsorshipReader};

use super::views::SubscriptionView;

/// Query for the caller's sponsorships.
#[derive(Debug, Clone)]
pub struct GetMySponsorshipsQuery {
    pub account: UserId,
}

/// One row of the "my sponsorships" page.
#[derive(Debug, Clone)]
pub struct MySponsorshipItem {
    pub sponsorship: Sponsorship,
    pub dog: Option<DogSummary>,
    pub payment_count: usize,
    pub last_payment: Option<Payment>,
    pub subscription: Option<SubscriptionView>,
}

#[derive(Debug, Clone)]
pub struct GetMySponsorshipsResult {
    /// Newest first.
    pub items: Vec<MySponsorshipItem>,
    pub summary: SponsorshipTotals,
}

/// Handler for the sponsor's own listing and totals.
pub struct GetMySponsorshipsHandler {
    reader: Arc<dyn SponsorshipReader>,
}

impl GetMySponsorshipsHandler {
    pub fn new(reader: Arc<dyn SponsorshipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetMySponsorshipsQuery,
    ) -> Result<GetMySponsorshipsResult, SponsorshipError> {
        let records = self.reader.list_for_account(&query.account).await?;
        let summary = self.reader.summary_for_account(&query.account).await?;

        let items = records
            .into_iter()
            .map(|record| {
                let subscription = SubscriptionView::from_record(&record);
                MySponsorshipItem {
                    payment_count: record.payments.len(),
                    last_payment: record.payments.first().cloned(),
                    dog: record.dog,
                    subscription,
                    sponsorship: record.sponsorship,
                }
            })
            .collect();

        Ok(GetMySponsorshipsResult { items, summary })
    }
}
