//! CancelSubscriptionHandler - Command handler for cancelling a recurring
//! sponsorship.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use crate::domain::sponsorship::{SponsorshipError, Subscription, SubscriptionStatus};
use crate::ports::{in_transaction, Clock, UnitOfWork};

use super::owned_subscription::{
    ignore_status_override, load_owned_subscription, save_owned_subscription,
};

/// Command to cancel a subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    /// Account of the caller; must own the subscription.
    pub account: UserId,
    /// Defaults to `true`: keep the paid period, stop renewing.
    pub cancel_at_period_end: Option<bool>,
    /// Optional explicit status; only `cancelled` is accepted.
    pub status: Option<String>,
}

/// Result of a successful cancellation.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    pub subscription: Subscription,
    /// End of the period that was current when cancelling.
    pub current_period_end: Timestamp,
}

/// Handler for cancelling subscriptions.
pub struct CancelSubscriptionHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl CancelSubscriptionHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, SponsorshipError> {
        ignore_status_override(cmd.status.as_deref(), SubscriptionStatus::Cancelled);
        let at_period_end = cmd.cancel_at_period_end.unwrap_or(true);
        let now = self.clock.now();

        let result = in_transaction(self.uow.as_ref(), move |tx| {
            Box::pin(async move {
                let mut owned =
                    load_owned_subscription(tx, cmd.subscription_id, &cmd.account).await?;
                let current_period_end = owned.period().end;

                owned.subscription.cancel(at_period_end, now);
                let owned = save_owned_subscription(tx, owned).await?;

                Ok::<_, SponsorshipError>(CancelSubscriptionResult {
                    subscription: owned.subscription,
                    current_period_end,
                })
            })
        })
        .await?;

        info!(
            subscription_id = %result.subscription.id,
            at_period_end,
            "subscription cancelled"
        );
        Ok(result)
    }
}
