//! Error types for the Assignment Ledger actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Ledger entry not found: {0}")]
    NotFound(String),

    /// Ledger entries are never edited or removed.
    #[error("The assignment ledger is append-only")]
    AppendOnly,

    /// The order already has a success entry for its current round.
    #[error("Order already assigned in this round (existing entry {0})")]
    DuplicateSuccess(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
