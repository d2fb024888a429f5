//! Sponsorship reader port (read side).
//!
//! Returns joined sponsorship records for the "my sponsorships" page and the
//! staff listing. Billing periods are derived from these records by the
//! query handlers, never stored.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::foundation::{DogId, DomainError, UserId};
use crate::domain::sponsorship::{Payment, Sponsor, Sponsorship, SponsorshipTotals, Subscription};

/// Reader port for sponsorship queries.
///
/// Soft-deleted sponsorships are never returned or counted.
#[async_trait]
pub trait SponsorshipReader: Send + Sync {
    /// Sponsorships owned by an account, newest first.
    async fn list_for_account(&self, account: &UserId) -> Result<Vec<SponsorshipRecord>, DomainError>;

    /// Settled payment totals for an account, grouped by plan type.
    ///
    /// Returns zeros when the account has no sponsorships.
    async fn summary_for_account(&self, account: &UserId) -> Result<SponsorshipTotals, DomainError>;

    /// Every sponsorship, newest first. Staff only.
    async fn list_all(&self) -> Result<Vec<SponsorshipRecord>, DomainError>;
}

/// Dog fields shown next to a sponsorship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DogSummary {
    pub id: DogId,
    pub name: String,
    pub photo_url: Option<String>,
}

/// A sponsorship joined with everything its views need.
#[derive(Debug, Clone)]
pub struct SponsorshipRecord {
    pub sponsorship: Sponsorship,
    pub sponsor: Sponsor,
    /// `None` when the dog row is gone.
    pub dog: Option<DogSummary>,
    pub subscription: Option<Subscription>,
    /// Ledger rows for the sponsorship, newest first.
    pub payments: Vec<Payment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sponsorship_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn SponsorshipReader) {}
    }
}
