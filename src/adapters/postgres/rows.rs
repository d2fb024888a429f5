//! Row types shared by the PostgreSQL sponsorship adapters.
//!
//! Each row converts into its domain type with `TryFrom`, failing with a
//! `DatabaseError` when a stored value no longer parses.

use chrono::{DateTime, Utc};

use crate::domain::foundation::{
    DogId, DomainError, ErrorCode, GenderId, PaymentId, PaymentMethodId, SponsorId, SponsorshipId,
    SubscriptionId, Timestamp, UserId,
};
use crate::domain::sponsorship::{
    Amount, BillingInterval, ContactDetails, NotificationChannel, NotificationFrequency,
    NotificationPreferences, Payment, PaymentStatus, PlanType, Sponsor, SponsorKind, Sponsorship,
    SponsorshipStatus, Subscription, SubscriptionStatus, TransactionRef,
};
use crate::ports::DogSummary;

fn corrupt(column: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid stored {}: {}", column, err),
    )
}

fn ts(value: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(value)
}

pub(crate) const SPONSOR_COLUMNS: &str = "id, kind, user_id, title, first_name, last_name, \
     email, phone, gender_id, created_at, updated_at";

/// Database row representation of a sponsor.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SponsorRow {
    pub id: i64,
    pub kind: String,
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SponsorRow> for Sponsor {
    type Error = DomainError;

    fn try_from(row: SponsorRow) -> Result<Self, Self::Error> {
        let kind = SponsorKind::parse(&row.kind).map_err(|e| corrupt("sponsor kind", e))?;
        let user_id = row
            .user_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| corrupt("sponsor user_id", e))?;

        Ok(Sponsor {
            id: SponsorId::from_row(row.id),
            kind,
            user_id,
            contact: ContactDetails {
                title: row.title,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                gender_id: row.gender_id.map(GenderId::from_row),
            },
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

pub(crate) const SPONSORSHIP_COLUMNS: &str = "id, sponsor_id, dog_id, plan_type, amount, status, \
     note, enabled_notification, notification_channel, notification_frequency, \
     created_at, updated_at, deleted_at, deleted_by_staff_id";

/// Database row representation of a sponsorship.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SponsorshipRow {
    pub id: i64,
    pub sponsor_id: i64,
    pub dog_id: i64,
    pub plan_type: String,
    pub amount: i64,
    pub status: String,
    pub note: Option<String>,
    pub enabled_notification: bool,
    pub notification_channel: Option<String>,
    pub notification_frequency: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub deleted_by_staff_id: Option<String>,
}

impl TryFrom<SponsorshipRow> for Sponsorship {
    type Error = DomainError;

    fn try_from(row: SponsorshipRow) -> Result<Self, Self::Error> {
        let plan_type = PlanType::parse(&row.plan_type).map_err(|e| corrupt("plan_type", e))?;
        let status = SponsorshipStatus::from_stored(&row.status);
        let deleted_by_staff_id = row
            .deleted_by_staff_id
            .map(UserId::new)
            .transpose()
            .map_err(|e| corrupt("deleted_by_staff_id", e))?;

        Ok(Sponsorship {
            id: SponsorshipId::from_row(row.id),
            sponsor_id: SponsorId::from_row(row.sponsor_id),
            dog_id: DogId::from_row(row.dog_id),
            plan_type,
            amount: Amount::from_row(row.amount),
            status,
            note: row.note,
            notifications: NotificationPreferences {
                enabled: row.enabled_notification,
                channel: row
                    .notification_channel
                    .as_deref()
                    .and_then(NotificationChannel::parse),
                frequency: row
                    .notification_frequency
                    .as_deref()
                    .and_then(NotificationFrequency::parse),
            },
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
            deleted_at: row.deleted_at.map(ts),
            deleted_by_staff_id,
        })
    }
}

pub(crate) const SUBSCRIPTION_COLUMNS: &str = "id, sponsorship_id, amount, billing_interval, status, \
     start_date, cancelled_at, ended_at, cancel_at_period_end, version, created_at, updated_at";

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SubscriptionRow {
    pub id: i64,
    pub sponsorship_id: i64,
    pub amount: i64,
    pub billing_interval: String,
    pub status: String,
    pub start_date: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
    pub cancel_at_period_end: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::from_stored(&row.status)
            .map_err(|e| corrupt("subscription status", e))?;

        Ok(Subscription {
            id: SubscriptionId::from_row(row.id),
            sponsorship_id: SponsorshipId::from_row(row.sponsorship_id),
            amount: Amount::from_row(row.amount),
            interval: BillingInterval::from_stored(&row.billing_interval),
            status,
            start_date: row.start_date.map(ts),
            cancelled_at: row.cancelled_at.map(ts),
            ended_at: row.ended_at.map(ts),
            cancel_at_period_end: row.cancel_at_period_end,
            version: row.version,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

pub(crate) const PAYMENT_COLUMNS: &str = "id, sponsorship_id, subscription_id, payment_method_id, \
     amount, status, transaction_ref, created_at";

/// Database row representation of a ledger entry.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PaymentRow {
    pub id: i64,
    pub sponsorship_id: i64,
    pub subscription_id: Option<i64>,
    pub payment_method_id: i64,
    pub amount: i64,
    pub status: String,
    pub transaction_ref: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status =
            PaymentStatus::from_stored(&row.status).map_err(|e| corrupt("payment status", e))?;

        Ok(Payment {
            id: PaymentId::from_row(row.id),
            sponsorship_id: SponsorshipId::from_row(row.sponsorship_id),
            subscription_id: row.subscription_id.map(SubscriptionId::from_row),
            payment_method_id: PaymentMethodId::from_row(row.payment_method_id),
            amount: Amount::from_row(row.amount),
            status,
            transaction_ref: TransactionRef::from_row(row.transaction_ref),
            created_at: ts(row.created_at),
        })
    }
}

/// Database row representation of a dog summary.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DogRow {
    pub id: i64,
    pub name: String,
    pub photo_url: Option<String>,
}

impl From<DogRow> for DogSummary {
    fn from(row: DogRow) -> Self {
        DogSummary {
            id: DogId::from_row(row.id),
            name: row.name,
            photo_url: row.photo_url,
        }
    }
}

/// Converts a batch of rows, stopping at the first corrupt one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, DomainError>
where
    T: TryFrom<R, Error = DomainError>,
{
    rows.into_iter().map(T::try_from).collect()
}
