//! PostgreSQL implementation of UnitOfWork.
//!
//! Every `SponsorshipTransaction` wraps one `sqlx::Transaction`. Dropping it
//! without `commit` rolls the database transaction back.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use super::rows::{
    PaymentRow, SponsorRow, SponsorshipRow, SubscriptionRow, PAYMENT_COLUMNS, SPONSORSHIP_COLUMNS,
    SPONSOR_COLUMNS, SUBSCRIPTION_COLUMNS,
};
use crate::domain::foundation::{
    DogId, DomainError, ErrorCode, PaymentMethodId, SponsorId, SponsorshipId, SubscriptionId,
    Timestamp, UserId,
};
use crate::domain::sponsorship::{
    GuestIdentity, NewPayment, NewSponsor, NewSponsorship, NewSubscription, Payment, Sponsor,
    SponsorKind, Sponsorship, Subscription, SubscriptionStatus, TransactionRef,
};
use crate::ports::{SponsorshipTransaction, UnitOfWork};

const TRANSACTION_REF_CONSTRAINT: &str = "sponsorship_payments_transaction_ref_key";
const SUBSCRIPTION_SPONSORSHIP_CONSTRAINT: &str = "subscriptions_sponsorship_id_key";

/// PostgreSQL implementation of the UnitOfWork port.
#[derive(Clone)]
pub struct PostgresUnitOfWork {
    pool: PgPool,
}

impl PostgresUnitOfWork {
    /// Creates a new PostgresUnitOfWork with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn begin(&self) -> Result<Box<dyn SponsorshipTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database("Failed to begin transaction", e))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

/// An open database transaction.
pub struct PostgresTransaction {
    tx: Transaction<'static, Postgres>,
}

fn unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.constraint() == Some(constraint))
}

#[async_trait]
impl SponsorshipTransaction for PostgresTransaction {
    async fn dog_exists(&mut self, id: DogId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM dogs WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id.as_i64())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::database("Failed to check dog", e))
    }

    async fn payment_method_exists(&mut self, id: PaymentMethodId) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM payment_methods WHERE id = $1)")
            .bind(id.as_i64())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to check payment method", e))
    }

    async fn find_user_sponsor(&mut self, account: &UserId) -> Result<Option<Sponsor>, DomainError> {
        let sql = format!(
            "SELECT {} FROM sponsors WHERE kind = 'user' AND user_id = $1",
            SPONSOR_COLUMNS
        );
        let row: Option<SponsorRow> = sqlx::query_as(&sql)
            .bind(account.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to find sponsor", e))?;

        row.map(Sponsor::try_from).transpose()
    }

    async fn find_guest_sponsor(
        &mut self,
        identity: &GuestIdentity,
    ) -> Result<Option<Sponsor>, DomainError> {
        let sql = format!(
            r#"SELECT {} FROM sponsors
               WHERE kind = 'guest'
                 AND first_name = $1 AND last_name = $2 AND email = $3 AND phone = $4"#,
            SPONSOR_COLUMNS
        );
        let row: Option<SponsorRow> = sqlx::query_as(&sql)
            .bind(&identity.first_name)
            .bind(&identity.last_name)
            .bind(&identity.email)
            .bind(&identity.phone)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to find guest sponsor", e))?;

        row.map(Sponsor::try_from).transpose()
    }

    async fn find_sponsor(&mut self, id: SponsorId) -> Result<Option<Sponsor>, DomainError> {
        let sql = format!("SELECT {} FROM sponsors WHERE id = $1", SPONSOR_COLUMNS);
        let row: Option<SponsorRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to find sponsor", e))?;

        row.map(Sponsor::try_from).transpose()
    }

    async fn insert_sponsor(&mut self, sponsor: &NewSponsor, now: Timestamp) -> Result<Sponsor, DomainError> {
        let sql = format!(
            r#"INSERT INTO sponsors (kind, user_id, title, first_name, last_name, email, phone,
                                     gender_id, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
               ON CONFLICT DO NOTHING
               RETURNING {}"#,
            SPONSOR_COLUMNS
        );
        let contact = &sponsor.contact;
        let inserted: Option<SponsorRow> = sqlx::query_as(&sql)
            .bind(sponsor.kind.as_str())
            .bind(sponsor.user_id.as_ref().map(UserId::as_str))
            .bind(&contact.title)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(contact.gender_id.map(|g| g.as_i64()))
            .bind(*now.as_datetime())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert sponsor", e))?;

        if let Some(row) = inserted {
            return Sponsor::try_from(row);
        }

        // A concurrent request created the same identity first
        let existing = match (sponsor.kind, &sponsor.user_id) {
            (SponsorKind::User, Some(account)) => self.find_user_sponsor(account).await?,
            _ => {
                let identity = GuestIdentity {
                    first_name: contact.first_name.clone().unwrap_or_default(),
                    last_name: contact.last_name.clone().unwrap_or_default(),
                    email: contact.email.clone().unwrap_or_default(),
                    phone: contact.phone.clone().unwrap_or_default(),
                };
                self.find_guest_sponsor(&identity).await?
            }
        };

        existing.ok_or_else(|| {
            DomainError::new(ErrorCode::Conflict, "Sponsor could not be created or found")
        })
    }

    async fn insert_sponsorship(
        &mut self,
        sponsorship: &NewSponsorship,
        now: Timestamp,
    ) -> Result<Sponsorship, DomainError> {
        let sql = format!(
            r#"INSERT INTO sponsorships (sponsor_id, dog_id, plan_type, amount, status, note,
                                         enabled_notification, notification_channel,
                                         notification_frequency, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
               RETURNING {}"#,
            SPONSORSHIP_COLUMNS
        );
        let prefs = &sponsorship.notifications;
        let row: SponsorshipRow = sqlx::query_as(&sql)
            .bind(sponsorship.sponsor_id.as_i64())
            .bind(sponsorship.dog_id.as_i64())
            .bind(sponsorship.plan_type.as_str())
            .bind(sponsorship.amount.as_i64())
            .bind(sponsorship.status.as_str())
            .bind(&sponsorship.note)
            .bind(prefs.enabled)
            .bind(prefs.channel.map(|c| c.as_str()))
            .bind(prefs.frequency.map(|f| f.as_str()))
            .bind(*now.as_datetime())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert sponsorship", e))?;

        Sponsorship::try_from(row)
    }

    async fn find_sponsorship(&mut self, id: SponsorshipId) -> Result<Option<Sponsorship>, DomainError> {
        let sql = format!(
            "SELECT {} FROM sponsorships WHERE id = $1 AND deleted_at IS NULL",
            SPONSORSHIP_COLUMNS
        );
        let row: Option<SponsorshipRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to find sponsorship", e))?;

        row.map(Sponsorship::try_from).transpose()
    }

    async fn update_sponsorship(&mut self, sponsorship: &Sponsorship) -> Result<(), DomainError> {
        let prefs = &sponsorship.notifications;
        let result = sqlx::query(
            r#"
            UPDATE sponsorships SET
                status = $2,
                note = $3,
                enabled_notification = $4,
                notification_channel = $5,
                notification_frequency = $6,
                updated_at = $7,
                deleted_at = $8,
                deleted_by_staff_id = $9
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(sponsorship.id.as_i64())
        .bind(sponsorship.status.as_str())
        .bind(&sponsorship.note)
        .bind(prefs.enabled)
        .bind(prefs.channel.map(|c| c.as_str()))
        .bind(prefs.frequency.map(|f| f.as_str()))
        .bind(*sponsorship.updated_at.as_datetime())
        .bind(sponsorship.deleted_at.map(|t| *t.as_datetime()))
        .bind(sponsorship.deleted_by_staff_id.as_ref().map(UserId::as_str))
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DomainError::database("Failed to update sponsorship", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::NotFound, "Sponsorship not found")
                .with_detail("id", sponsorship.id.to_string()));
        }

        Ok(())
    }

    async fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
        now: Timestamp,
    ) -> Result<Subscription, DomainError> {
        let sql = format!(
            r#"INSERT INTO subscriptions (sponsorship_id, amount, billing_interval, status, start_date,
                                          cancel_at_period_end, version, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, FALSE, 1, $6, $6)
               RETURNING {}"#,
            SUBSCRIPTION_COLUMNS
        );
        let row: SubscriptionRow = sqlx::query_as(&sql)
            .bind(subscription.sponsorship_id.as_i64())
            .bind(subscription.amount.as_i64())
            .bind(subscription.interval.as_str())
            .bind(SubscriptionStatus::Active.as_str())
            .bind(*subscription.start_date.as_datetime())
            .bind(*now.as_datetime())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                if unique_violation(&e, SUBSCRIPTION_SPONSORSHIP_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        "Sponsorship already has a subscription",
                    );
                }
                DomainError::database("Failed to insert subscription", e)
            })?;

        Subscription::try_from(row)
    }

    async fn find_subscription(&mut self, id: SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to find subscription", e))?;

        row.map(Subscription::try_from).transpose()
    }

    async fn update_subscription(&mut self, subscription: &Subscription) -> Result<Subscription, DomainError> {
        let sql = format!(
            r#"UPDATE subscriptions SET
                   status = $3,
                   cancelled_at = $4,
                   ended_at = $5,
                   cancel_at_period_end = $6,
                   updated_at = $7,
                   version = version + 1
               WHERE id = $1 AND version = $2
               RETURNING {}"#,
            SUBSCRIPTION_COLUMNS
        );
        let row: Option<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(subscription.id.as_i64())
            .bind(subscription.version)
            .bind(subscription.status.as_str())
            .bind(subscription.cancelled_at.map(|t| *t.as_datetime()))
            .bind(subscription.ended_at.map(|t| *t.as_datetime()))
            .bind(subscription.cancel_at_period_end)
            .bind(*subscription.updated_at.as_datetime())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to update subscription", e))?;

        match row {
            Some(row) => Subscription::try_from(row),
            None if self.find_subscription(subscription.id).await?.is_none() => Err(
                DomainError::new(ErrorCode::NotFound, "Subscription not found")
                    .with_detail("id", subscription.id.to_string()),
            ),
            None => Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Subscription {} was modified concurrently", subscription.id),
            )),
        }
    }

    async fn transaction_ref_exists(&mut self, reference: &TransactionRef) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sponsorship_payments WHERE transaction_ref = $1)",
        )
        .bind(reference.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| DomainError::database("Failed to check transaction reference", e))
    }

    async fn insert_payment(&mut self, payment: &NewPayment, now: Timestamp) -> Result<Payment, DomainError> {
        let sql = format!(
            r#"INSERT INTO sponsorship_payments (sponsorship_id, subscription_id, payment_method_id,
                                                 amount, status, transaction_ref, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {}"#,
            PAYMENT_COLUMNS
        );
        let row: PaymentRow = sqlx::query_as(&sql)
            .bind(payment.sponsorship_id.as_i64())
            .bind(payment.subscription_id.map(|s| s.as_i64()))
            .bind(payment.payment_method_id.as_i64())
            .bind(payment.amount.as_i64())
            .bind(payment.status.as_str())
            .bind(payment.transaction_ref.as_str())
            .bind(*now.as_datetime())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| {
                if unique_violation(&e, TRANSACTION_REF_CONSTRAINT) {
                    return DomainError::new(
                        ErrorCode::Conflict,
                        "Transaction reference already exists",
                    );
                }
                DomainError::database("Failed to insert payment", e)
            })?;

        Payment::try_from(row)
    }

    async fn payments_for_subscription(&mut self, id: SubscriptionId) -> Result<Vec<Payment>, DomainError> {
        let sql = format!(
            r#"SELECT {} FROM sponsorship_payments
               WHERE subscription_id = $1
               ORDER BY id DESC"#,
            PAYMENT_COLUMNS
        );
        let rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(id.as_i64())
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| DomainError::database("Failed to load payments", e))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| DomainError::database("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DomainError::database("Failed to roll back transaction", e))
    }
}
