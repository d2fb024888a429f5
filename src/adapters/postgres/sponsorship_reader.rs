//! PostgreSQL implementation of SponsorshipReader.
//!
//! Loads the matching sponsorships first, then their sponsors, dogs,
//! subscriptions and payments in one query per table.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use super::rows::{
    convert_all, DogRow, PaymentRow, SponsorRow, SponsorshipRow, SubscriptionRow, PAYMENT_COLUMNS,
    SPONSORSHIP_COLUMNS, SPONSOR_COLUMNS, SUBSCRIPTION_COLUMNS,
};
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::sponsorship::{
    Payment, PlanType, Sponsor, Sponsorship, SponsorshipTotals, Subscription,
};
use crate::ports::{DogSummary, SponsorshipReader, SponsorshipRecord};

/// PostgreSQL implementation of the SponsorshipReader port.
#[derive(Clone)]
pub struct PostgresSponsorshipReader {
    pool: PgPool,
}

impl PostgresSponsorshipReader {
    /// Creates a new PostgresSponsorshipReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn sponsorships(&self, account: Option<&UserId>) -> Result<Vec<Sponsorship>, DomainError> {
        let rows: Vec<SponsorshipRow> = match account {
            Some(account) => {
                let sql = format!(
                    r#"SELECT {} FROM sponsorships
                       WHERE deleted_at IS NULL
                         AND sponsor_id IN (SELECT id FROM sponsors WHERE kind = 'user' AND user_id = $1)
                       ORDER BY id DESC"#,
                    SPONSORSHIP_COLUMNS
                );
                sqlx::query_as::<_, SponsorshipRow>(&sql)
                    .bind(account.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    r#"SELECT {} FROM sponsorships
                       WHERE deleted_at IS NULL
                       ORDER BY id DESC"#,
                    SPONSORSHIP_COLUMNS
                );
                sqlx::query_as::<_, SponsorshipRow>(&sql).fetch_all(&self.pool).await
            }
        }
        .map_err(|e| DomainError::database("Failed to list sponsorships", e))?;

        convert_all(rows)
    }

    async fn records(&self, sponsorships: Vec<Sponsorship>) -> Result<Vec<SponsorshipRecord>, DomainError> {
        if sponsorships.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = sponsorships.iter().map(|s| s.id.as_i64()).collect();
        let sponsor_ids: Vec<i64> = sponsorships.iter().map(|s| s.sponsor_id.as_i64()).collect();
        let dog_ids: Vec<i64> = sponsorships.iter().map(|s| s.dog_id.as_i64()).collect();

        let sql = format!("SELECT {} FROM sponsors WHERE id = ANY($1)", SPONSOR_COLUMNS);
        let sponsor_rows: Vec<SponsorRow> = sqlx::query_as(&sql)
            .bind(&sponsor_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load sponsors", e))?;
        let sponsors: HashMap<_, Sponsor> = convert_all::<_, Sponsor>(sponsor_rows)?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let dog_rows: Vec<DogRow> =
            sqlx::query_as("SELECT id, name, photo_url FROM dogs WHERE id = ANY($1)")
                .bind(&dog_ids)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to load dogs", e))?;
        let dogs: HashMap<_, DogSummary> = dog_rows
            .into_iter()
            .map(DogSummary::from)
            .map(|d| (d.id, d))
            .collect();

        let sql = format!(
            "SELECT {} FROM subscriptions WHERE sponsorship_id = ANY($1)",
            SUBSCRIPTION_COLUMNS
        );
        let subscription_rows: Vec<SubscriptionRow> = sqlx::query_as(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load subscriptions", e))?;
        let mut subscriptions: HashMap<_, Subscription> =
            convert_all::<_, Subscription>(subscription_rows)?
                .into_iter()
                .map(|s| (s.sponsorship_id, s))
                .collect();

        let sql = format!(
            r#"SELECT {} FROM sponsorship_payments
               WHERE sponsorship_id = ANY($1)
               ORDER BY id DESC"#,
            PAYMENT_COLUMNS
        );
        let payment_rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(&ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to load payments", e))?;
        let mut payments: HashMap<_, Vec<Payment>> = HashMap::new();
        for payment in convert_all::<_, Payment>(payment_rows)? {
            payments.entry(payment.sponsorship_id).or_default().push(payment);
        }

        sponsorships
            .into_iter()
            .map(|sponsorship| {
                let sponsor = sponsors.get(&sponsorship.sponsor_id).cloned().ok_or_else(|| {
                    DomainError::new(ErrorCode::DatabaseError, "Sponsorship without sponsor")
                        .with_detail("id", sponsorship.id.to_string())
                })?;
                Ok(SponsorshipRecord {
                    dog: dogs.get(&sponsorship.dog_id).cloned(),
                    subscription: subscriptions.remove(&sponsorship.id),
                    payments: payments.remove(&sponsorship.id).unwrap_or_default(),
                    sponsor,
                    sponsorship,
                })
            })
            .collect()
    }
}

/// Settled total per plan type.
#[derive(Debug, sqlx::FromRow)]
struct TotalRow {
    plan_type: String,
    total: i64,
}

#[async_trait]
impl SponsorshipReader for PostgresSponsorshipReader {
    async fn list_for_account(&self, account: &UserId) -> Result<Vec<SponsorshipRecord>, DomainError> {
        let sponsorships = self.sponsorships(Some(account)).await?;
        self.records(sponsorships).await
    }

    async fn summary_for_account(&self, account: &UserId) -> Result<SponsorshipTotals, DomainError> {
        let rows: Vec<TotalRow> = sqlx::query_as(
            r#"
            SELECT s.plan_type, COALESCE(SUM(p.amount), 0)::BIGINT AS total
            FROM sponsorship_payments p
            JOIN sponsorships s ON s.id = p.sponsorship_id
            JOIN sponsors sp ON sp.id = s.sponsor_id
            WHERE sp.kind = 'user'
              AND sp.user_id = $1
              AND s.deleted_at IS NULL
              AND UPPER(p.status) IN ('SUCCEEDED', 'PAID', 'COMPLETED')
            GROUP BY s.plan_type
            "#,
        )
        .bind(account.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to sum payments", e))?;

        let mut totals = SponsorshipTotals::default();
        for row in rows {
            let plan_type = PlanType::parse(&row.plan_type).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid stored plan_type: {}", e),
                )
            })?;
            totals.add_settled(plan_type, row.total);
        }
        Ok(totals)
    }

    async fn list_all(&self) -> Result<Vec<SponsorshipRecord>, DomainError> {
        let sponsorships = self.sponsorships(None).await?;
        self.records(sponsorships).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_reader_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PostgresSponsorshipReader>();
    }
}
