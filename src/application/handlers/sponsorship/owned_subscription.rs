//! Loading and saving a subscription on behalf of its owner.

use tracing::debug;

use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::sponsorship::{
    BillingPeriod, Payment, Sponsorship, SponsorshipError, SponsorshipStatus, Subscription,
    SubscriptionStatus,
};
use crate::ports::SponsorshipTransaction;

/// A subscription together with its sponsorship and ledger rows.
#[derive(Debug, Clone)]
pub(super) struct OwnedSubscription {
    pub subscription: Subscription,
    pub sponsorship: Sponsorship,
    pub payments: Vec<Payment>,
}

impl OwnedSubscription {
    pub fn period(&self) -> BillingPeriod {
        BillingPeriod::compute(&self.sponsorship, &self.subscription, &self.payments)
    }
}

/// Loads a subscription the account owns.
///
/// Subscriptions owned by someone else, or whose sponsorship was deleted,
/// are reported as not found.
pub(super) async fn load_owned_subscription(
    tx: &mut dyn SponsorshipTransaction,
    id: SubscriptionId,
    account: &UserId,
) -> Result<OwnedSubscription, SponsorshipError> {
    let not_found = || SponsorshipError::not_found("subscription", id);

    let subscription = tx.find_subscription(id).await?.ok_or_else(not_found)?;
    let sponsorship = tx
        .find_sponsorship(subscription.sponsorship_id)
        .await?
        .ok_or_else(not_found)?;
    let sponsor = tx
        .find_sponsor(sponsorship.sponsor_id)
        .await?
        .ok_or_else(not_found)?;
    if !sponsor.is_owned_by(account) {
        return Err(not_found());
    }

    let payments = tx.payments_for_subscription(id).await?;
    Ok(OwnedSubscription {
        subscription,
        sponsorship,
        payments,
    })
}

/// Writes the subscription and mirrors its status onto the sponsorship.
pub(super) async fn save_owned_subscription(
    tx: &mut dyn SponsorshipTransaction,
    mut owned: OwnedSubscription,
) -> Result<OwnedSubscription, SponsorshipError> {
    let now = owned.subscription.updated_at;
    owned.subscription = tx.update_subscription(&owned.subscription).await?;
    owned
        .sponsorship
        .mirror(SponsorshipStatus::from(owned.subscription.status), now);
    tx.update_sponsorship(&owned.sponsorship).await?;
    Ok(owned)
}

/// Logs a status override that disagrees with the transition being applied.
///
/// The transition always wins; the override is informational only.
pub(super) fn ignore_status_override(raw: Option<&str>, target: SubscriptionStatus) {
    let expected = SponsorshipStatus::from(target);
    let requested = SponsorshipStatus::normalize(raw, expected.clone());
    if requested != expected {
        debug!(
            requested = requested.as_str(),
            applied = expected.as_str(),
            "ignoring subscription status override"
        );
    }
}
