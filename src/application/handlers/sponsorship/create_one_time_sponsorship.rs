//! CreateOneTimeSponsorshipHandler - Command handler for single donations.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{PaymentId, SponsorshipId, UserId};
use crate::domain::sponsorship::{
    PaymentStatus, PlanType, RefPrefix, SponsorshipError, SponsorshipStatus,
};
use crate::ports::{in_transaction, Clock, UnitOfWork};

use super::factory::{insert_sponsorship, SponsorshipDraftInput};
use super::payment_ledger::{record_payment, LedgerEntry};

/// Command to record a one-time sponsorship.
///
/// Guests may donate without a session.
#[derive(Debug, Clone)]
pub struct CreateOneTimeSponsorshipCommand {
    /// Account of the current session, if any.
    pub session_account: Option<UserId>,
    pub plan_type: String,
    pub draft: SponsorshipDraftInput,
}

/// Result of a successful one-time sponsorship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOneTimeSponsorshipResult {
    pub sponsorship_id: SponsorshipId,
    pub payment_id: PaymentId,
}

/// Handler for one-time sponsorships.
///
/// Writes the sponsor (if new), the sponsorship and one succeeded ledger row
/// in a single transaction.
pub struct CreateOneTimeSponsorshipHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl CreateOneTimeSponsorshipHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: CreateOneTimeSponsorshipCommand,
    ) -> Result<CreateOneTimeSponsorshipResult, SponsorshipError> {
        // 1. Validate everything that needs no storage
        if PlanType::parse(&cmd.plan_type)? != PlanType::OneTime {
            return Err(SponsorshipError::validation(
                "plan_type",
                "expected a one-time plan",
            ));
        }
        let draft = cmd
            .draft
            .validate(cmd.session_account.as_ref(), SponsorshipStatus::Completed)?;
        let now = self.clock.now();

        // 2. Write sponsor, sponsorship and payment atomically
        let result = in_transaction(self.uow.as_ref(), move |tx| {
            Box::pin(async move {
                let (_, sponsorship) =
                    insert_sponsorship(tx, &draft, PlanType::OneTime, now).await?;
                let payment = record_payment(
                    tx,
                    LedgerEntry {
                        sponsorship_id: sponsorship.id,
                        subscription_id: None,
                        payment_method_id: draft.payment_method_id,
                        amount: sponsorship.amount,
                        status: PaymentStatus::Succeeded,
                    },
                    RefPrefix::OneTime,
                    now,
                )
                .await?;
                Ok::<_, SponsorshipError>(CreateOneTimeSponsorshipResult {
                    sponsorship_id: sponsorship.id,
                    payment_id: payment.id,
                })
            })
        })
        .await?;

        info!(sponsorship_id = %result.sponsorship_id, "one-time sponsorship created");
        Ok(result)
    }
}
