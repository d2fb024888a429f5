//! CreateSubscriptionSponsorshipHandler - Command handler for recurring
//! sponsorships.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{PaymentId, SponsorshipId, SubscriptionId, UserId};
use crate::domain::sponsorship::{
    BillingInterval, NewSubscription, PaymentStatus, PlanType, RefPrefix, SponsorRequest,
    SponsorshipError, SponsorshipStatus,
};
use crate::ports::{in_transaction, Clock, UnitOfWork};

use super::factory::{insert_sponsorship, SponsorshipDraftInput};
use super::payment_ledger::{record_payment, LedgerEntry};

/// Command to start a recurring sponsorship.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionSponsorshipCommand {
    /// Account of the current session. Required.
    pub session_account: Option<UserId>,
    pub plan_type: String,
    /// `monthly`, `quarterly`, `yearly` or `annually`.
    pub interval: String,
    pub draft: SponsorshipDraftInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSubscriptionSponsorshipResult {
    pub sponsorship_id: SponsorshipId,
    pub subscription_id: SubscriptionId,
    pub payment_id: PaymentId,
}

/// Handler for recurring sponsorships.
///
/// The subscription starts now; its first period is paid by the ledger row
/// written in the same transaction.
pub struct CreateSubscriptionSponsorshipHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl CreateSubscriptionSponsorshipHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionSponsorshipCommand,
    ) -> Result<CreateSubscriptionSponsorshipResult, SponsorshipError> {
        // 1. Only signed-in accounts may subscribe
        let account = cmd.session_account.ok_or_else(|| {
            SponsorshipError::forbidden("Subscriptions require a signed-in account")
        })?;

        // 2. Validate everything that needs no storage
        if PlanType::parse(&cmd.plan_type)? != PlanType::Subscription {
            return Err(SponsorshipError::validation(
                "plan_type",
                "expected a subscription plan",
            ));
        }
        let interval = BillingInterval::parse(&cmd.interval)?;
        let draft = cmd.draft.validate(Some(&account), SponsorshipStatus::Active)?;
        if !matches!(draft.sponsor, SponsorRequest::User { .. }) {
            return Err(SponsorshipError::validation(
                "sponsor.kind",
                "subscriptions must be sponsored by the signed-in user",
            ));
        }
        let now = self.clock.now();

        // 3. Write sponsorship, subscription and first payment atomically
        let result = in_transaction(self.uow.as_ref(), move |tx| {
            Box::pin(async move {
                let (_, sponsorship) =
                    insert_sponsorship(tx, &draft, PlanType::Subscription, now).await?;
                let subscription = tx
                    .insert_subscription(
                        &NewSubscription {
                            sponsorship_id: sponsorship.id,
                            amount: sponsorship.amount,
                            interval,
                            start_date: now,
                        },
                        now,
                    )
                    .await?;
                let payment = record_payment(
                    tx,
                    LedgerEntry {
                        sponsorship_id: sponsorship.id,
                        subscription_id: Some(subscription.id),
                        payment_method_id: draft.payment_method_id,
                        amount: sponsorship.amount,
                        status: PaymentStatus::Succeeded,
                    },
                    RefPrefix::Subscription,
                    now,
                )
                .await?;
                Ok::<_, SponsorshipError>(CreateSubscriptionSponsorshipResult {
                    sponsorship_id: sponsorship.id,
                    subscription_id: subscription.id,
                    payment_id: payment.id,
                })
            })
        })
        .await?;

        info!(
            sponsorship_id = %result.sponsorship_id,
            subscription_id = %result.subscription_id,
            interval = %interval,
            "subscription sponsorship created"
        );
        Ok(result)
    }
}
