//! Match orchestration: candidates, selection, reservation, ledger append, commit.

use super::actions::MatchOutcome;
use super::entity::OrderContext;
use super::error::OrderError;
use crate::lifecycle::Transition;
use crate::matcher::{self, Selection};
use crate::model::{AssignmentDraft, Order, PartnerFilter, PartnerId};
use crate::partner_actor::{PartnerError, ReleaseReason};
use tracing::{error, info, warn};

/// One attempt plus one retry after a lost reservation race.
const MATCH_ATTEMPTS: usize = 2;

impl Order {
    /// Runs a match for a pending order. Any other status is `InvalidState`.
    ///
    /// On success the partner's load is reserved, a success entry is on the ledger and the
    /// order is `assigned`, all three or none: a failed append releases the reservation
    /// again and leaves the order pending.
    pub(super) async fn assign(
        &mut self,
        ctx: &OrderContext,
    ) -> Result<MatchOutcome, OrderError> {
        let assigned = self
            .status
            .apply(Transition::Assign)
            .map_err(|e| OrderError::InvalidState {
                id: self.id,
                status: e.from,
                operation: "match",
            })?;
        let mut lost: Option<PartnerId> = None;

        for attempt in 1..=MATCH_ATTEMPTS {
            let candidates = ctx
                .partners
                .list_partners(PartnerFilter::in_area(self.area.clone()))
                .await?;

            let partner_id = match matcher::select(&self.area, &candidates, ctx.capacity_ceiling) {
                Selection::Chosen(partner_id) => partner_id,
                Selection::Unavailable(reason) => {
                    let entry_id = ctx
                        .ledger
                        .append(AssignmentDraft::Failed {
                            order_id: self.id,
                            reason,
                            round: self.assignment_round,
                        })
                        .await?;
                    info!(order = %self.id, area = %self.area, %reason, "No partner available");
                    return Ok(MatchOutcome::Unassigned { reason, entry_id });
                }
            };

            match ctx.partners.reserve(partner_id, ctx.capacity_ceiling).await {
                Ok(_) => {}
                Err(
                    e @ (PartnerError::AtCapacity { .. }
                    | PartnerError::Inactive(_)
                    | PartnerError::NotFound(_)),
                ) => {
                    warn!(
                        order = %self.id,
                        partner = %partner_id,
                        attempt,
                        error = %e,
                        "Lost reservation race"
                    );
                    lost = Some(partner_id);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            let draft = AssignmentDraft::Success {
                order_id: self.id,
                partner_id,
                round: self.assignment_round,
            };
            let entry_id = match ctx.ledger.append(draft).await {
                Ok(entry_id) => entry_id,
                Err(e) => {
                    warn!(
                        order = %self.id,
                        partner = %partner_id,
                        error = %e,
                        "Ledger append failed, rolling back reservation"
                    );
                    if let Err(release) = ctx
                        .partners
                        .release(partner_id, ReleaseReason::Rollback)
                        .await
                    {
                        error!(partner = %partner_id, error = %release, "Rollback failed");
                    }
                    return Err(e.into());
                }
            };

            self.status = assigned;
            self.assigned_to = Some(partner_id);
            info!(order = %self.id, partner = %partner_id, entry = %entry_id, "Assigned");
            return Ok(MatchOutcome::Assigned {
                partner_id,
                entry_id,
            });
        }

        Err(OrderError::ConcurrencyConflict(format!(
            "{} lost the reservation of {} twice",
            self.id,
            lost.map_or_else(|| "a partner".to_string(), |p| p.to_string())
        )))
    }
}
