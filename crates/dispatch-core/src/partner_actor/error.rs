//! Error types for the Partner actor.

use crate::model::PartnerId;
use thiserror::Error;

/// Errors that can occur during partner operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PartnerError {
    /// The requested partner was not found.
    #[error("Partner not found: {0}")]
    NotFound(String),

    /// Reserving one more assignment would exceed the capacity ceiling.
    #[error("{id} is at capacity: load {load}, ceiling {capacity}")]
    AtCapacity {
        id: PartnerId,
        load: u32,
        capacity: u32,
    },

    /// Inactive partners cannot take new assignments.
    #[error("{0} is inactive")]
    Inactive(PartnerId),

    /// Release requested while the partner holds no open assignment.
    #[error("{0} holds no open assignment")]
    NoOpenAssignment(PartnerId),

    /// The partner data provided is invalid.
    #[error("Partner validation error: {0}")]
    Validation(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
