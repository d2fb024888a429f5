//! Shared steps of the two sponsorship creation commands.

use crate::domain::foundation::{
    DogId, PaymentMethodId, Timestamp, UserId,
};
use crate::domain::sponsorship::{
    Amount, NewSponsorship, NotificationPreferences, PlanType, Sponsor, SponsorInput,
    SponsorRequest, Sponsorship, SponsorshipError, SponsorshipStatus,
};
use crate::ports::SponsorshipTransaction;

use super::sponsor_resolver::resolve_sponsor;

/// Request fields common to both plan types.
#[derive(Debug, Clone, Default)]
pub struct SponsorshipDraftInput {
    pub dog_id: i64,
    pub payment_method_id: i64,
    pub amount: i64,
    pub status: Option<String>,
    pub sponsor: SponsorInput,
    pub note: Option<String>,
    pub notifications: NotificationPreferences,
}

/// Input that passed every check that needs no storage.
#[derive(Debug, Clone)]
pub(super) struct ValidatedDraft {
    pub sponsor: SponsorRequest,
    pub dog_id: DogId,
    pub payment_method_id: PaymentMethodId,
    pub amount: Amount,
    pub status: SponsorshipStatus,
    pub note: Option<String>,
    pub notifications: NotificationPreferences,
}

impl SponsorshipDraftInput {
    pub(super) fn validate(
        &self,
        session_account: Option<&UserId>,
        fallback_status: SponsorshipStatus,
    ) -> Result<ValidatedDraft, SponsorshipError> {
        Ok(ValidatedDraft {
            amount: Amount::new(self.amount)?,
            dog_id: DogId::new(self.dog_id)?,
            payment_method_id: PaymentMethodId::new(self.payment_method_id)?,
            sponsor: self.sponsor.validate(session_account)?,
            status: SponsorshipStatus::normalize(self.status.as_deref(), fallback_status),
            note: self
                .note
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            notifications: self.notifications,
        })
    }
}

/// Checks the referenced dog and payment method, resolves the sponsor and
/// inserts the sponsorship row.
pub(super) async fn insert_sponsorship(
    tx: &mut dyn SponsorshipTransaction,
    draft: &ValidatedDraft,
    plan_type: PlanType,
    now: Timestamp,
) -> Result<(Sponsor, Sponsorship), SponsorshipError> {
    if !tx.dog_exists(draft.dog_id).await? {
        return Err(SponsorshipError::not_found("dog", draft.dog_id));
    }
    if !tx.payment_method_exists(draft.payment_method_id).await? {
        return Err(SponsorshipError::not_found("payment method", draft.payment_method_id));
    }

    let sponsor = resolve_sponsor(tx, &draft.sponsor, now).await?;
    let sponsorship = tx
        .insert_sponsorship(
            &NewSponsorship {
                sponsor_id: sponsor.id,
                dog_id: draft.dog_id,
                plan_type,
                amount: draft.amount,
                status: draft.status.clone(),
                note: draft.note.clone(),
                notifications: draft.notifications,
            },
            now,
        )
        .await?;
    Ok((sponsor, sponsorship))
}
