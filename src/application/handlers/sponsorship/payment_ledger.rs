//! Payment ledger - the only writer of ledger rows.

use tracing::{debug, info};

use crate::domain::foundation::{
    DomainError, ErrorCode, PaymentMethodId, SponsorshipId, SubscriptionId, Timestamp,
};
use crate::domain::sponsorship::{Amount, NewPayment, Payment, PaymentStatus, RefPrefix, TransactionRef};
use crate::ports::SponsorshipTransaction;

/// Attempts at finding an unused transaction reference.
pub const MAX_REFERENCE_ATTEMPTS: usize = 5;

/// A settled transaction to append.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub sponsorship_id: SponsorshipId,
    pub subscription_id: Option<SubscriptionId>,
    pub payment_method_id: PaymentMethodId,
    pub amount: Amount,
    pub status: PaymentStatus,
}

/// Appends `entry` with a freshly generated reference.
pub async fn record_payment(
    tx: &mut dyn SponsorshipTransaction,
    entry: LedgerEntry,
    prefix: RefPrefix,
    now: Timestamp,
) -> Result<Payment, DomainError> {
    record_payment_with(tx, entry, now, |at| TransactionRef::generate(prefix, at)).await
}

/// Appends `entry`, drawing references from `next_ref` until one is unused.
pub async fn record_payment_with<G>(
    tx: &mut dyn SponsorshipTransaction,
    entry: LedgerEntry,
    now: Timestamp,
    mut next_ref: G,
) -> Result<Payment, DomainError>
where
    G: FnMut(Timestamp) -> TransactionRef + Send,
{
    for attempt in 1..=MAX_REFERENCE_ATTEMPTS {
        let reference = next_ref(now);
        if tx.transaction_ref_exists(&reference).await? {
            debug!(reference = %reference, attempt, "transaction reference taken, regenerating");
            continue;
        }

        let payment = tx
            .insert_payment(
                &NewPayment {
                    sponsorship_id: entry.sponsorship_id,
                    subscription_id: entry.subscription_id,
                    payment_method_id: entry.payment_method_id,
                    amount: entry.amount,
                    status: entry.status,
                    transaction_ref: reference,
                },
                now,
            )
            .await?;
        info!(
            payment_id = %payment.id,
            sponsorship_id = %payment.sponsorship_id,
            reference = %payment.transaction_ref,
            "payment recorded"
        );
        return Ok(payment);
    }

    Err(DomainError::new(
        ErrorCode::Conflict,
        "Could not generate a unique transaction reference",
    ))
}
