//! Fixtures shared by the sponsorship handler tests.

use chrono::{TimeZone, Utc};
use std::sync::Arc;

use crate::adapters::clock::ManualClock;
use crate::adapters::memory::InMemorySponsorshipStore;
use crate::domain::foundation::{DogId, PaymentMethodId, Timestamp, UserId};
use crate::domain::sponsorship::{NotificationPreferences, SponsorInput};

use super::{
    CreateSubscriptionSponsorshipCommand, CreateSubscriptionSponsorshipHandler,
    CreateSubscriptionSponsorshipResult, SponsorshipDraftInput,
};

pub const DOG: i64 = 1;
pub const OTHER_DOG: i64 = 2;
pub const CARD: i64 = 1;

pub fn at(y: i32, m: u32, d: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap())
}

pub fn clock_at(y: i32, m: u32, d: u32) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(at(y, m, d)))
}

pub async fn seeded_store() -> Arc<InMemorySponsorshipStore> {
    let store = InMemorySponsorshipStore::new();
    store
        .seed_dog(DogId::new(DOG).unwrap(), "Biscuit", Some("/img/biscuit.jpg".to_string()))
        .await;
    store.seed_dog(DogId::new(OTHER_DOG).unwrap(), "Mango", None).await;
    store
        .seed_payment_method(PaymentMethodId::new(CARD).unwrap(), "Credit card")
        .await;
    Arc::new(store)
}

pub fn account(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

pub fn user_sponsor() -> SponsorInput {
    SponsorInput {
        kind: "user".to_string(),
        ..Default::default()
    }
}

pub fn guest_sponsor() -> SponsorInput {
    SponsorInput {
        kind: "guest".to_string(),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        phone: Some("0812345678".to_string()),
        ..Default::default()
    }
}

pub fn draft(dog_id: i64, amount: i64, sponsor: SponsorInput) -> SponsorshipDraftInput {
    SponsorshipDraftInput {
        dog_id,
        payment_method_id: CARD,
        amount,
        status: None,
        sponsor,
        note: None,
        notifications: NotificationPreferences::default(),
    }
}

/// Creates a subscription sponsorship for `owner` at the clock's time.
pub async fn subscribe(
    store: &Arc<InMemorySponsorshipStore>,
    clock: &Arc<ManualClock>,
    owner: &str,
    amount: i64,
    interval: &str,
) -> CreateSubscriptionSponsorshipResult {
    CreateSubscriptionSponsorshipHandler::new(store.clone(), clock.clone())
        .handle(CreateSubscriptionSponsorshipCommand {
            session_account: Some(account(owner)),
            plan_type: "subscription".to_string(),
            interval: interval.to_string(),
            draft: draft(DOG, amount, user_sponsor()),
        })
        .await
        .unwrap()
}
