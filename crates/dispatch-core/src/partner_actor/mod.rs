//! # Partner Directory
//!
//! Holds delivery partners: identity, service areas, active flag, current load and
//! performance counters.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](dispatch_actor::ActorEntity) implementation for [`Partner`]
//! - [`error`] - [`PartnerError`]
//! - [`actions`] - [`PartnerAction`] and [`PartnerActionResult`]
//!
//! ## Load accounting
//!
//! `current_load` moves only through [`PartnerAction::Reserve`] and
//! [`PartnerAction::Release`]. Because the actor handles one request at a time, two
//! matches racing for the last free slot of a partner are serialized here: the second
//! `Reserve` sees the incremented load and fails with [`PartnerError::AtCapacity`].

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::PartnerClient;
use crate::model::Partner;
use dispatch_actor::ResourceActor;

/// Creates a new Partner actor and its client. Run it with a [`Clock`](crate::clock::Clock).
pub fn new(mailbox_size: usize) -> (ResourceActor<Partner>, PartnerClient) {
    let (actor, generic_client) = ResourceActor::new(mailbox_size);
    (actor, PartnerClient::new(generic_client))
}
