//! Unit of work port (write side).
//!
//! Every sponsorship write spans several rows: a sponsor, a sponsorship, a
//! subscription and a ledger entry. They must land together or not at all,
//! so writes go through a [`SponsorshipTransaction`] opened by a
//! [`UnitOfWork`] and finished with `commit` or `rollback`.
//!
//! # Example
//!
//! ```ignore
//! let id = in_transaction(uow, move |tx| {
//!     Box::pin(async move {
//!         let sponsorship = tx.insert_sponsorship(&new, now).await?;
//!         tx.insert_payment(&payment, now).await?;
//!         Ok::<_, SponsorshipError>(sponsorship.id)
//!     })
//! })
//! .await?;
//! ```

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::domain::foundation::{
    DogId, DomainError, PaymentMethodId, SponsorId, SponsorshipId, SubscriptionId, Timestamp,
    UserId,
};
use crate::domain::sponsorship::{
    GuestIdentity, NewPayment, NewSponsor, NewSponsorship, NewSubscription, Payment, Sponsor,
    Sponsorship, Subscription, TransactionRef,
};

/// Opens transactions against the sponsorship store.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn SponsorshipTransaction>, DomainError>;
}

/// An open transaction.
///
/// Dropping it without calling `commit` discards every write.
/// Lookups never return soft-deleted sponsorships.
#[async_trait]
pub trait SponsorshipTransaction: Send {
    /// Whether a non-deleted dog with this id exists.
    async fn dog_exists(&mut self, id: DogId) -> Result<bool, DomainError>;

    async fn payment_method_exists(&mut self, id: PaymentMethodId) -> Result<bool, DomainError>;

    /// Finds the `user` sponsor linked to an account.
    async fn find_user_sponsor(&mut self, account: &UserId) -> Result<Option<Sponsor>, DomainError>;

    /// Finds a `guest` sponsor by its exact identity tuple.
    async fn find_guest_sponsor(
        &mut self,
        identity: &GuestIdentity,
    ) -> Result<Option<Sponsor>, DomainError>;

    async fn find_sponsor(&mut self, id: SponsorId) -> Result<Option<Sponsor>, DomainError>;

    /// Inserts a sponsor.
    ///
    /// If a concurrent writer already inserted the same account or guest
    /// identity, returns that row instead of failing.
    async fn insert_sponsor(&mut self, sponsor: &NewSponsor, now: Timestamp) -> Result<Sponsor, DomainError>;

    async fn insert_sponsorship(
        &mut self,
        sponsorship: &NewSponsorship,
        now: Timestamp,
    ) -> Result<Sponsorship, DomainError>;

    async fn find_sponsorship(&mut self, id: SponsorshipId) -> Result<Option<Sponsorship>, DomainError>;

    /// Persists status, timestamps and deletion markers of a sponsorship.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the sponsorship does not exist or is already deleted
    async fn update_sponsorship(&mut self, sponsorship: &Sponsorship) -> Result<(), DomainError>;

    async fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
        now: Timestamp,
    ) -> Result<Subscription, DomainError>;

    async fn find_subscription(&mut self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Persists a subscription if its `version` still matches storage.
    ///
    /// Returns the stored row with the bumped version.
    ///
    /// # Errors
    ///
    /// - `Conflict` if another writer updated the row first
    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<Subscription, DomainError>;

    async fn transaction_ref_exists(&mut self, reference: &TransactionRef) -> Result<bool, DomainError>;

    /// Appends a ledger row.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the transaction reference is already taken
    async fn insert_payment(&mut self, payment: &NewPayment, now: Timestamp) -> Result<Payment, DomainError>;

    /// All ledger rows for a subscription, newest first.
    async fn payments_for_subscription(&mut self, id: SubscriptionId) -> Result<Vec<Payment>, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

/// Runs `work` inside one transaction.
///
/// Commits when `work` returns `Ok`, rolls back when it returns `Err`.
/// A failed rollback is logged and the original error is returned.
pub async fn in_transaction<T, E, F>(uow: &dyn UnitOfWork, work: F) -> Result<T, E>
where
    E: From<DomainError>,
    F: for<'t> FnOnce(&'t mut dyn SponsorshipTransaction) -> BoxFuture<'t, Result<T, E>>,
{
    let mut tx = uow.begin().await?;
    match work(tx.as_mut()).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "transaction rollback failed");
            }
            Err(err)
        }
    }
}
