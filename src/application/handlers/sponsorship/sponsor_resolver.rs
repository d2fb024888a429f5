//! Sponsor identity resolution.
//!
//! Finds the sponsor row for a validated request, inserting one when none
//! exists. Existing sponsors are never updated: a repeat guest donation with
//! a new title does not overwrite the stored one.

use tracing::info;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::sponsorship::{NewSponsor, Sponsor, SponsorRequest};
use crate::ports::SponsorshipTransaction;

/// Finds or creates the sponsor for `request`.
pub async fn resolve_sponsor(
    tx: &mut dyn SponsorshipTransaction,
    request: &SponsorRequest,
    now: Timestamp,
) -> Result<Sponsor, DomainError> {
    let existing = match request {
        SponsorRequest::User { account, .. } => tx.find_user_sponsor(account).await?,
        SponsorRequest::Guest { identity, .. } => tx.find_guest_sponsor(identity).await?,
    };
    if let Some(sponsor) = existing {
        return Ok(sponsor);
    }

    let sponsor = tx.insert_sponsor(&NewSponsor::from(request.clone()), now).await?;
    info!(sponsor_id = %sponsor.id, kind = %sponsor.kind, "sponsor created");
    Ok(sponsor)
}
