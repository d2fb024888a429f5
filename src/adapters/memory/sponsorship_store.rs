//! In-memory sponsorship store.
//!
//! Implements both `UnitOfWork` and `SponsorshipReader` over plain maps.
//! A transaction holds the store's async mutex for its whole lifetime and
//! works on a copy of the tables; `commit` swaps the copy in, anything else
//! throws it away. Transactions are therefore fully serialized.
//!
//! This adapter backs the test suite. It is not meant for production data.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::foundation::{
    DogId, DomainError, ErrorCode, PaymentId, PaymentMethodId, SponsorId, SponsorshipId,
    SubscriptionId, Timestamp, UserId,
};
use crate::domain::sponsorship::{
    GuestIdentity, NewPayment, NewSponsor, NewSponsorship, NewSubscription, Payment, Sponsor,
    SponsorKind, Sponsorship, SponsorshipTotals, Subscription, SubscriptionStatus,
    TransactionRef,
};
use crate::ports::{
    DogSummary, SponsorshipReader, SponsorshipRecord, SponsorshipTransaction, UnitOfWork,
};

#[derive(Debug, Clone)]
struct DogRow {
    summary: DogSummary,
    deleted: bool,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    dogs: BTreeMap<DogId, DogRow>,
    payment_methods: BTreeMap<PaymentMethodId, String>,
    sponsors: BTreeMap<SponsorId, Sponsor>,
    sponsorships: BTreeMap<SponsorshipId, Sponsorship>,
    subscriptions: BTreeMap<SubscriptionId, Subscription>,
    payments: BTreeMap<PaymentId, Payment>,
    last_sponsor_id: i64,
    last_sponsorship_id: i64,
    last_subscription_id: i64,
    last_payment_id: i64,
}

impl Tables {
    fn live_sponsorship(&self, id: SponsorshipId) -> Option<&Sponsorship> {
        self.sponsorships.get(&id).filter(|s| !s.is_deleted())
    }

    fn payments_newest_first(&self, filter: impl Fn(&Payment) -> bool) -> Vec<Payment> {
        self.payments
            .values()
            .rev()
            .filter(|p| filter(p))
            .cloned()
            .collect()
    }

    fn record(&self, sponsorship: &Sponsorship) -> Option<SponsorshipRecord> {
        let sponsor = self.sponsors.get(&sponsorship.sponsor_id)?.clone();
        let subscription = self
            .subscriptions
            .values()
            .find(|s| s.sponsorship_id == sponsorship.id)
            .cloned();
        Some(SponsorshipRecord {
            sponsorship: sponsorship.clone(),
            sponsor,
            dog: self.dogs.get(&sponsorship.dog_id).map(|d| d.summary.clone()),
            subscription,
            payments: self.payments_newest_first(|p| p.sponsorship_id == sponsorship.id),
        })
    }

    fn records(&self, include: impl Fn(&Sponsor) -> bool) -> Vec<SponsorshipRecord> {
        let mut live: Vec<&Sponsorship> = self
            .sponsorships
            .values()
            .filter(|s| !s.is_deleted())
            .filter(|s| self.sponsors.get(&s.sponsor_id).map_or(false, &include))
            .collect();
        live.sort_by(|a, b| b.id.cmp(&a.id));
        live.into_iter().filter_map(|s| self.record(s)).collect()
    }
}

#[derive(Debug, Default)]
struct Failures {
    payment_insert: AtomicBool,
    subscription_conflict: AtomicBool,
}

/// In-memory implementation of the sponsorship ports.
#[derive(Debug, Clone, Default)]
pub struct InMemorySponsorshipStore {
    tables: Arc<Mutex<Tables>>,
    failures: Arc<Failures>,
}

impl InMemorySponsorshipStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Reference data ===

    /// Adds a dog that sponsorships may reference.
    pub async fn seed_dog(&self, id: DogId, name: impl Into<String>, photo_url: Option<String>) {
        self.tables.lock().await.dogs.insert(
            id,
            DogRow {
                summary: DogSummary {
                    id,
                    name: name.into(),
                    photo_url,
                },
                deleted: false,
            },
        );
    }

    /// Adds a payment method that ledger rows may reference.
    pub async fn seed_payment_method(&self, id: PaymentMethodId, name: impl Into<String>) {
        self.tables
            .lock()
            .await
            .payment_methods
            .insert(id, name.into());
    }

    /// Appends a ledger row outside of any command, e.g. a failed charge.
    pub async fn append_payment(&self, payment: NewPayment, at: Timestamp) -> Payment {
        let mut tables = self.tables.lock().await;
        tables.last_payment_id += 1;
        let stored = Payment {
            id: PaymentId::from_row(tables.last_payment_id),
            sponsorship_id: payment.sponsorship_id,
            subscription_id: payment.subscription_id,
            payment_method_id: payment.payment_method_id,
            amount: payment.amount,
            status: payment.status,
            transaction_ref: payment.transaction_ref,
            created_at: at,
        };
        tables.payments.insert(stored.id, stored.clone());
        stored
    }

    // === Failure injection ===

    /// Makes every subsequent ledger insert fail with a database error.
    pub fn fail_payment_inserts(&self, fail: bool) {
        self.failures.payment_insert.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent subscription update lose the version check.
    pub fn fail_subscription_updates_with_conflict(&self, fail: bool) {
        self.failures
            .subscription_conflict
            .store(fail, Ordering::SeqCst);
    }

    // === Inspection ===

    pub async fn sponsors(&self) -> Vec<Sponsor> {
        self.tables.lock().await.sponsors.values().cloned().collect()
    }

    /// All sponsorships including soft-deleted ones.
    pub async fn sponsorships(&self) -> Vec<Sponsorship> {
        self.tables
            .lock()
            .await
            .sponsorships
            .values()
            .cloned()
            .collect()
    }

    pub async fn subscriptions(&self) -> Vec<Subscription> {
        self.tables
            .lock()
            .await
            .subscriptions
            .values()
            .cloned()
            .collect()
    }

    pub async fn payments(&self) -> Vec<Payment> {
        self.tables.lock().await.payments.values().cloned().collect()
    }
}

#[async_trait]
impl UnitOfWork for InMemorySponsorshipStore {
    async fn begin(&self) -> Result<Box<dyn SponsorshipTransaction>, DomainError> {
        let guard = Arc::clone(&self.tables).lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryTransaction {
            guard,
            working,
            failures: Arc::clone(&self.failures),
        }))
    }
}

/// A transaction over a private copy of the tables.
pub struct InMemoryTransaction {
    guard: OwnedMutexGuard<Tables>,
    working: Tables,
    failures: Arc<Failures>,
}

#[async_trait]
impl SponsorshipTransaction for InMemoryTransaction {
    async fn dog_exists(&mut self, id: DogId) -> Result<bool, DomainError> {
        Ok(self.working.dogs.get(&id).map_or(false, |d| !d.deleted))
    }

    async fn payment_method_exists(&mut self, id: PaymentMethodId) -> Result<bool, DomainError> {
        Ok(self.working.payment_methods.contains_key(&id))
    }

    async fn find_user_sponsor(&mut self, account: &UserId) -> Result<Option<Sponsor>, DomainError> {
        Ok(self
            .working
            .sponsors
            .values()
            .find(|s| s.is_owned_by(account))
            .cloned())
    }

    async fn find_guest_sponsor(
        &mut self,
        identity: &GuestIdentity,
    ) -> Result<Option<Sponsor>, DomainError> {
        Ok(self
            .working
            .sponsors
            .values()
            .find(|s| s.matches_guest(identity))
            .cloned())
    }

    async fn find_sponsor(&mut self, id: SponsorId) -> Result<Option<Sponsor>, DomainError> {
        Ok(self.working.sponsors.get(&id).cloned())
    }

    async fn insert_sponsor(&mut self, sponsor: &NewSponsor, now: Timestamp) -> Result<Sponsor, DomainError> {
        let existing = self.working.sponsors.values().find(|s| {
            s.kind == sponsor.kind
                && match sponsor.kind {
                    SponsorKind::User => s.user_id == sponsor.user_id,
                    SponsorKind::Guest => s.contact.first_name == sponsor.contact.first_name
                        && s.contact.last_name == sponsor.contact.last_name
                        && s.contact.email == sponsor.contact.email
                        && s.contact.phone == sponsor.contact.phone,
                }
        });
        if let Some(existing) = existing {
            return Ok(existing.clone());
        }

        self.working.last_sponsor_id += 1;
        let stored = Sponsor {
            id: SponsorId::from_row(self.working.last_sponsor_id),
            kind: sponsor.kind,
            user_id: sponsor.user_id.clone(),
            contact: sponsor.contact.clone(),
            created_at: now,
            updated_at: now,
        };
        self.working.sponsors.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_sponsorship(
        &mut self,
        sponsorship: &NewSponsorship,
        now: Timestamp,
    ) -> Result<Sponsorship, DomainError> {
        self.working.last_sponsorship_id += 1;
        let stored = Sponsorship {
            id: SponsorshipId::from_row(self.working.last_sponsorship_id),
            sponsor_id: sponsorship.sponsor_id,
            dog_id: sponsorship.dog_id,
            plan_type: sponsorship.plan_type,
            amount: sponsorship.amount,
            status: sponsorship.status.clone(),
            note: sponsorship.note.clone(),
            notifications: sponsorship.notifications,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            deleted_by_staff_id: None,
        };
        self.working.sponsorships.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_sponsorship(&mut self, id: SponsorshipId) -> Result<Option<Sponsorship>, DomainError> {
        Ok(self.working.live_sponsorship(id).cloned())
    }

    async fn update_sponsorship(&mut self, sponsorship: &Sponsorship) -> Result<(), DomainError> {
        if self.working.live_sponsorship(sponsorship.id).is_none() {
            return Err(DomainError::new(ErrorCode::NotFound, "Sponsorship not found")
                .with_detail("id", sponsorship.id.to_string()));
        }
        self.working
            .sponsorships
            .insert(sponsorship.id, sponsorship.clone());
        Ok(())
    }

    async fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        if self
            .working
            .subscriptions
            .values()
            .any(|s| s.sponsorship_id == subscription.sponsorship_id)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Sponsorship already has a subscription",
            ));
        }
        self.working.last_subscription_id += 1;
        let stored = Subscription {
            id: SubscriptionId::from_row(self.working.last_subscription_id),
            sponsorship_id: subscription.sponsorship_id,
            amount: subscription.amount,
            interval: subscription.interval,
            status: SubscriptionStatus::Active,
            start_date: Some(subscription.start_date),
            cancelled_at: None,
            ended_at: None,
            cancel_at_period_end: false,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.working.subscriptions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_subscription(&mut self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.working.subscriptions.get(&id).cloned())
    }

    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<Subscription, DomainError> {
        let current = self
            .working
            .subscriptions
            .get(&subscription.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::NotFound, "Subscription not found")
                    .with_detail("id", subscription.id.to_string())
            })?;

        if current.version != subscription.version
            || self.failures.subscription_conflict.load(Ordering::SeqCst)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Subscription {} was modified concurrently", subscription.id),
            ));
        }

        let mut stored = subscription.clone();
        stored.version += 1;
        self.working.subscriptions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn transaction_ref_exists(&mut self, reference: &TransactionRef) -> Result<bool, DomainError> {
        Ok(self
            .working
            .payments
            .values()
            .any(|p| &p.transaction_ref == reference))
    }

    async fn insert_payment(&mut self, payment: &NewPayment, now: Timestamp) -> Result<Payment, DomainError> {
        if self.failures.payment_insert.load(Ordering::SeqCst) {
            return Err(DomainError::database("insert payment", "injected failure"));
        }
        if self.transaction_ref_exists(&payment.transaction_ref).await? {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Transaction reference already exists",
            ));
        }

        self.working.last_payment_id += 1;
        let stored = Payment {
            id: PaymentId::from_row(self.working.last_payment_id),
            sponsorship_id: payment.sponsorship_id,
            subscription_id: payment.subscription_id,
            payment_method_id: payment.payment_method_id,
            amount: payment.amount,
            status: payment.status,
            transaction_ref: payment.transaction_ref.clone(),
            created_at: now,
        };
        self.working.payments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn payments_for_subscription(&mut self, id: SubscriptionId) -> Result<Vec<Payment>, DomainError> {
        Ok(self
            .working
            .payments_newest_first(|p| p.subscription_id == Some(id)))
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let InMemoryTransaction {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl SponsorshipReader for InMemorySponsorshipStore {
    async fn list_for_account(&self, account: &UserId) -> Result<Vec<SponsorshipRecord>, DomainError> {
        Ok(self.tables.lock().await.records(|s| s.is_owned_by(account)))
    }

    async fn summary_for_account(&self, account: &UserId) -> Result<SponsorshipTotals, DomainError> {
        let tables = self.tables.lock().await;
        let mut totals = SponsorshipTotals::default();
        for payment in tables.payments.values() {
            let Some(sponsorship) = tables.live_sponsorship(payment.sponsorship_id) else {
                continue;
            };
            let owned = tables
                .sponsors
                .get(&sponsorship.sponsor_id)
                .map_or(false, |s| s.is_owned_by(account));
            if owned {
                totals.record(sponsorship.plan_type, payment);
            }
        }
        Ok(totals)
    }

    async fn list_all(&self) -> Result<Vec<SponsorshipRecord>, DomainError> {
        Ok(self.tables.lock().await.records(|_| true))
    }
}
