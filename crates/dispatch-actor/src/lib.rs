//! # Dispatch Actor
//!
//! A small resource-actor runtime used by the dispatch engine to own its stores.
//!
//! Each store (orders, partners, the assignment ledger) is a [`ResourceActor`] running in
//! its own Tokio task. Callers talk to it through a cloneable [`ResourceClient`], which
//! sends typed requests over a bounded channel and awaits a oneshot reply.
//!
//! ## Why actors for stores?
//!
//! - **Exclusive state**: an actor handles one request at a time, so a record's
//!   read-check-write (e.g. "is this order still pending?" followed by "mark it assigned")
//!   can never interleave with another request to the same store. No locks.
//! - **Late-bound wiring**: dependencies are passed to [`ResourceActor::run`] as the
//!   entity's `Context`, so the order store can call the partner directory and the ledger
//!   without construction-order knots.
//! - **Substitutable**: [`mock::MockClient`] speaks the same protocol, which is how the
//!   domain tests run the order store against scripted partner and ledger replies.
//!
//! ## Request kinds
//!
//! | Request | Hook | Reply |
//! |---|---|---|
//! | `Create` | `from_create_params`, `conflicts_with`, `on_create` | new id |
//! | `Get` | - | `Option<T>` |
//! | `List` | `matches` | `Vec<T>` in id order |
//! | `Update` | `on_update` | updated record |
//! | `Delete` | `on_delete` | `()` |
//! | `Action` | `handle_action` | `T::ActionResult` |
//!
//! Entity errors travel as [`FrameworkError::EntityError`]; domain clients turn them back
//! into their own enums with [`FrameworkError::into_entity_error`].

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use crate::tracing::setup_tracing;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
