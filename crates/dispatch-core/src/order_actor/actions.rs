//! Custom actions for the Order actor.
//!
//! Each action runs inside the order store's message loop, so while one action is
//! awaiting the partner directory or the ledger no other request for any order is
//! processed. That is what keeps two matches of the same order apart.

use crate::model::{AssignmentId, FailureReason, Order, PartnerId};

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Find a partner for a pending order.
    Match,
    /// assigned -> picked.
    MarkPicked,
    /// picked -> delivered; frees the partner and counts a completion.
    MarkDelivered,
    /// assigned | picked -> pending; frees the partner and counts a cancellation.
    Cancel,
}

/// Result of a match attempt. Failing to find a partner is an outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Assigned {
        partner_id: PartnerId,
        entry_id: AssignmentId,
    },
    Unassigned {
        reason: FailureReason,
        entry_id: AssignmentId,
    },
}

impl MatchOutcome {
    pub fn partner(&self) -> Option<PartnerId> {
        match self {
            MatchOutcome::Assigned { partner_id, .. } => Some(*partner_id),
            MatchOutcome::Unassigned { .. } => None,
        }
    }

    pub fn entry_id(&self) -> AssignmentId {
        match self {
            MatchOutcome::Assigned { entry_id, .. } | MatchOutcome::Unassigned { entry_id, .. } => {
                *entry_id
            }
        }
    }
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    Match(MatchOutcome),
    MarkPicked(Order),
    MarkDelivered(Order),
    Cancel(Order),
}
