//! [`ActorEntity`] implementation for [`AssignmentEntry`].

use super::error::LedgerError;
use crate::clock::Clock;
use crate::model::{
    AssignmentDraft, AssignmentEntry, AssignmentFilter, AssignmentId, AssignmentStatus,
};
use async_trait::async_trait;
use dispatch_actor::ActorEntity;

/// Ledger entries cannot be updated.
#[derive(Debug)]
pub enum LedgerUpdate {}

/// Ledger entries have no actions.
#[derive(Debug)]
pub enum LedgerAction {}

#[async_trait]
impl ActorEntity for AssignmentEntry {
    type Id = AssignmentId;
    type Create = AssignmentDraft;
    type Update = LedgerUpdate;
    type Filter = AssignmentFilter;
    type Action = LedgerAction;
    type ActionResult = ();
    type Context = Clock;
    type Error = LedgerError;

    fn from_create_params(
        id: AssignmentId,
        draft: AssignmentDraft,
        clock: &Clock,
    ) -> Result<Self, LedgerError> {
        let created_at = clock();
        Ok(match draft {
            AssignmentDraft::Success {
                order_id,
                partner_id,
                round,
            } => Self {
                id,
                order_id,
                partner_id: Some(partner_id),
                round,
                status: AssignmentStatus::Success,
                reason: None,
                created_at,
            },
            AssignmentDraft::Failed {
                order_id,
                reason,
                round,
            } => Self {
                id,
                order_id,
                partner_id: None,
                round,
                status: AssignmentStatus::Failed,
                reason: Some(reason),
                created_at,
            },
        })
    }

    /// At most one success per order and assignment round.
    fn conflicts_with(&self, existing: &Self) -> bool {
        self.is_success()
            && existing.is_success()
            && self.order_id == existing.order_id
            && self.round == existing.round
    }

    fn matches(&self, filter: &AssignmentFilter) -> bool {
        filter.matches(self)
    }

    async fn on_update(&mut self, update: LedgerUpdate, _clock: &Clock) -> Result<(), LedgerError> {
        match update {}
    }

    async fn on_delete(&self, _clock: &Clock) -> Result<(), LedgerError> {
        Err(LedgerError::AppendOnly)
    }

    async fn handle_action(
        &mut self,
        action: LedgerAction,
        _clock: &Clock,
    ) -> Result<(), LedgerError> {
        match action {}
    }
}
