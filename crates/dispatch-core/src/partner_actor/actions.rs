//! Custom actions for the Partner actor.
//!
//! Load and counter changes happen only here, one request at a time, so a reservation is
//! an atomic compare-and-increment against the capacity ceiling.

use crate::model::{Partner, PartnerStatus};

#[derive(Debug, Clone)]
pub enum PartnerAction {
    /// Take one more open assignment if the partner is active and below `capacity`.
    ///
    /// # Errors
    /// `Inactive` or `AtCapacity`; the load is left unchanged.
    Reserve { capacity: u32 },
    /// Give back one open assignment.
    Release(ReleaseReason),
    /// Activate or deactivate. Does not touch the current load.
    SetStatus(PartnerStatus),
}

/// Why an open assignment ended. Decides which counter moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// Order delivered: `completed_orders` goes up.
    Completed,
    /// Order cancelled: `cancelled_orders` goes up.
    Cancelled,
    /// A match that reserved this partner could not be recorded; only the load is undone.
    Rollback,
}

/// Results from PartnerActions - variants match 1:1 with PartnerAction
#[derive(Debug, Clone)]
pub enum PartnerActionResult {
    /// Load after the reservation.
    Reserve(u32),
    /// Load after the release.
    Release(u32),
    SetStatus(Partner),
}
