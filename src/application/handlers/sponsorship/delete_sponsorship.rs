//! DeleteSponsorshipHandler - Staff soft deletion of a sponsorship.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, SponsorshipId, UserId};
use crate::domain::sponsorship::SponsorshipError;
use crate::ports::{in_transaction, Clock, UnitOfWork};

#[derive(Debug, Clone)]
pub struct DeleteSponsorshipCommand {
    pub sponsorship_id: SponsorshipId,
    pub caller: AuthenticatedUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteSponsorshipResult {
    pub sponsorship_id: SponsorshipId,
    pub deleted_by_staff_id: UserId,
}

/// Handler for staff soft deletes.
///
/// The sponsorship is hidden from every listing and lifecycle lookup. Its
/// subscription and ledger rows stay in place.
pub struct DeleteSponsorshipHandler {
    uow: Arc<dyn UnitOfWork>,
    clock: Arc<dyn Clock>,
}

impl DeleteSponsorshipHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, clock: Arc<dyn Clock>) -> Self {
        Self { uow, clock }
    }

    pub async fn handle(
        &self,
        cmd: DeleteSponsorshipCommand,
    ) -> Result<DeleteSponsorshipResult, SponsorshipError> {
        let staff_id = cmd
            .caller
            .staff_id()
            .cloned()
            .ok_or_else(|| SponsorshipError::forbidden("Staff access required"))?;
        let id = cmd.sponsorship_id;
        let now = self.clock.now();

        let result = in_transaction(self.uow.as_ref(), move |tx| {
            Box::pin(async move {
                let mut sponsorship = tx
                    .find_sponsorship(id)
                    .await?
                    .ok_or_else(|| SponsorshipError::not_found("sponsorship", id))?;

                sponsorship.soft_delete(staff_id.clone(), now);
                tx.update_sponsorship(&sponsorship).await?;

                Ok::<_, SponsorshipError>(DeleteSponsorshipResult {
                    sponsorship_id: id,
                    deleted_by_staff_id: staff_id,
                })
            })
        })
        .await?;

        info!(
            sponsorship_id = %result.sponsorship_id,
            staff_id = %result.deleted_by_staff_id,
            "sponsorship deleted"
        );
        Ok(result)
    }
}
