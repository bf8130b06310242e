//! Error types for the Order actor.

use crate::ledger_actor::LedgerError;
use crate::lifecycle::Transition;
use crate::model::{OrderId, OrderStatus};
use crate::partner_actor::PartnerError;
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// `NotFound`, `InvalidState` and `InvalidTransition` are final: retrying will not help.
/// `ConcurrencyConflict` is transient; the matcher has already retried once before
/// returning it.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The order's status forbids the operation (e.g. matching an order that is not pending).
    #[error("cannot {operation} {id} while it is {status}")]
    InvalidState {
        id: OrderId,
        status: OrderStatus,
        operation: &'static str,
    },

    /// A lifecycle transition was requested out of sequence.
    #[error("{id}: cannot {transition} an order that is {from}")]
    InvalidTransition {
        id: OrderId,
        from: OrderStatus,
        transition: Transition,
    },

    /// Lost a race for a partner slot, twice.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// The order data provided is invalid.
    #[error("Order validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Partner(#[from] PartnerError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
