//! ReactivateSubscriptionHandler - Command handler for resuming a cancelled
//! subscription within its paid period.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use crate::domain::sponsorship::{SponsorshipError, Subscription, SubscriptionStatus};
use crate::ports::{in_transaction, Clock, UnitOfWork};

use super::owned_subscription::{
    ignore_status_override, load_owned_subscription, save_owned_subscription,
};

/// Command to reactivate a subscription.
#[derive(Debug, Clone)]
pub struct ReactivateSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    /// Account of the caller; must own the subscription.
    pub account: UserId,
    /// Defaults to `false`.
    pub cancel_at_period_end: Option<bool>,
    /// Optional explicit status; only `active` is accepted.
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReactivateSubscriptionResult {
    pub subscription: Subscription,
    pub current_period_end: Timestamp,
    pub next_payment_at: Timestamp,
}

/// Handler for reactivating subscriptions.
///
/// Reactivation is refused once the current billing period has ended; the
/// sponsor must start a new subscription instead.
pub struct ReactivateSubscriptionHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl ReactivateSubscriptionHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: ReactivateSubscriptionCommand,
    ) -> Result<ReactivateSubscriptionResult, SponsorshipError> {
        ignore_status_override(cmd.status.as_deref(), SubscriptionStatus::Active);
        let cancel_at_period_end = cmd.cancel_at_period_end.unwrap_or(false);
        let now = self.clock.now();

        let result = in_transaction(self.uow.as_ref(), move |tx| {
            Box::pin(async move {
                let mut owned =
                    load_owned_subscription(tx, cmd.subscription_id, &cmd.account).await?;

                let period = owned.period();
                if period.has_ended(now) {
                    return Err(SponsorshipError::period_ended(
                        owned.subscription.id,
                        period.end,
                    ));
                }

                owned.subscription.reactivate(cancel_at_period_end, now);
                let owned = save_owned_subscription(tx, owned).await?;

                Ok::<_, SponsorshipError>(ReactivateSubscriptionResult {
                    subscription: owned.subscription,
                    current_period_end: period.end,
                    next_payment_at: period.next_payment_at(),
                })
            })
        })
        .await?;

        info!(subscription_id = %result.subscription.id, "subscription reactivated");
        Ok(result)
    }
}
