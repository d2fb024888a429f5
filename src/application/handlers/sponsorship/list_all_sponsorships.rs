//! ListAllSponsorshipsHandler - Staff query over every sponsorship.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedUser;
use crate::domain::sponsorship::{Payment, Sponsor, Sponsorship, SponsorshipError};
use crate::ports::{DogSummary, SponsorshipReader};

use super::views::SubscriptionView;

#[derive(Debug, Clone)]
pub struct ListAllSponsorshipsQuery {
    pub caller: AuthenticatedUser,
}

/// One row of the staff listing.
#[derive(Debug, Clone)]
pub struct AdminSponsorshipItem {
    pub sponsorship: Sponsorship,
    pub sponsor: Sponsor,
    pub dog: Option<DogSummary>,
    pub subscription: Option<SubscriptionView>,
    /// Newest first.
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone)]
pub struct ListAllSponsorshipsResult {
    pub items: Vec<AdminSponsorshipItem>,
}

/// Handler for the staff sponsorship listing.
pub struct ListAllSponsorshipsHandler {
    reader: Arc<dyn SponsorshipReader>,
}

impl ListAllSponsorshipsHandler {
    pub fn new(reader: Arc<dyn SponsorshipReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: ListAllSponsorshipsQuery,
    ) -> Result<ListAllSponsorshipsResult, SponsorshipError> {
        if !query.caller.is_staff() {
            return Err(SponsorshipError::forbidden("Staff access required"));
        }

        let items = self
            .reader
            .list_all()
            .await?
            .into_iter()
            .map(|record| AdminSponsorshipItem {
                subscription: SubscriptionView::from_record(&record),
                sponsorship: record.sponsorship,
                sponsor: record.sponsor,
                dog: record.dog,
                payments: record.payments,
            })
            .collect();

        Ok(ListAllSponsorshipsResult { items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::sponsorship::test_support::*;
    use crate::domain::foundation::UserId;

    fn staff() -> AuthenticatedUser {
        AuthenticatedUser::staff(UserId::new("s-1").unwrap())
    }

    #[tokio::test]
    async fn staff_sees_every_sponsor() {
        let store = seeded_store().await;
        let clock = clock_at(2025, 1, 10);
        subscribe(&store, &clock, "7", 1000, "monthly").await;
        clock.advance_days(1);
        subscribe(&store, &clock, "8", 2000, "yearly").await;

        let result = ListAllSponsorshipsHandler::new(store.clone())
            .handle(ListAllSponsorshipsQuery { caller: staff() })
            .await
            .unwrap();

        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].sponsorship.amount.as_i64(), 2000);
        assert_eq!(
            result.items[0].sponsor.user_id.as_ref().map(|u| u.as_str()),
            Some("8")
        );
        let view = result.items[0].subscription.as_ref().unwrap();
        assert_eq!(view.current_period_end, at(2026, 1, 11));
        assert_eq!(result.items[0].payments.len(), 1);
    }

    #[tokio::test]
    async fn user_principal_is_forbidden() {
        let store = seeded_store().await;

        let err = ListAllSponsorshipsHandler::new(store.clone())
            .handle(ListAllSponsorshipsQuery {
                caller: AuthenticatedUser::user(account("7")),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, SponsorshipError::Forbidden(_)));
    }
}
