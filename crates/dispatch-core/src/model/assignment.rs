//! Assignment ledger entries: one per match attempt.
use crate::model::{OrderId, PartnerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for ledger entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentId(pub u32);

impl From<u32> for AssignmentId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for AssignmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "assignment_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Success,
    Failed,
}

/// Why a match attempt found nobody. Recorded on the ledger, never raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    #[serde(rename = "no eligible partner in area")]
    NoEligiblePartnerInArea,
    #[serde(rename = "all eligible partners at capacity")]
    AllEligiblePartnersAtCapacity,
}

impl FailureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureReason::NoEligiblePartnerInArea => "no eligible partner in area",
            FailureReason::AllEligiblePartnersAtCapacity => "all eligible partners at capacity",
        }
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentEntry {
    pub id: AssignmentId,
    pub order_id: OrderId,
    /// Set exactly when `status` is `Success`.
    pub partner_id: Option<PartnerId>,
    /// The order's `assignment_round` at the time of the attempt.
    pub round: u32,
    pub status: AssignmentStatus,
    /// Set exactly when `status` is `Failed`.
    pub reason: Option<FailureReason>,
    pub created_at: DateTime<Utc>,
}

impl AssignmentEntry {
    pub fn is_success(&self) -> bool {
        self.status == AssignmentStatus::Success
    }
}

/// Payload for appending to the ledger. The two shapes keep partner and reason exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentDraft {
    Success {
        order_id: OrderId,
        partner_id: PartnerId,
        round: u32,
    },
    Failed {
        order_id: OrderId,
        reason: FailureReason,
        round: u32,
    },
}

/// Ledger query. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    pub order_id: Option<OrderId>,
    pub partner_id: Option<PartnerId>,
    pub status: Option<AssignmentStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl AssignmentFilter {
    pub fn for_order(order_id: OrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, entry: &AssignmentEntry) -> bool {
        self.order_id.map_or(true, |id| id == entry.order_id)
            && self.partner_id.map_or(true, |id| Some(id) == entry.partner_id)
            && self.status.map_or(true, |status| status == entry.status)
            && self.from.map_or(true, |from| entry.created_at >= from)
            && self.to.map_or(true, |to| entry.created_at <= to)
    }
}
