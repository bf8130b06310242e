//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a record type (order, partner, ledger entry, ...)
//! implements to be owned by a [`ResourceActor`](crate::ResourceActor). It names the
//! identifier, the creation and update payloads, the list filter, the custom actions and
//! their results, the injected context and the error type, and provides the lifecycle hooks
//! the actor calls while it processes its mailbox.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs after construction and before the record is stored.
//! - [`ActorEntity::on_delete`] runs before removal; returning an error keeps the record.
//! - [`ActorEntity::conflicts_with`] is checked against every stored record on create.
//!
//! The defaults accept everything.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so an entity can call other actors while its own actor is
/// busy with the request. The `Context` type is handed to `run()` and then to every hook,
/// which lets actors be wired together after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Identifier for this entity. Generated by the actor from a `u32` counter and kept in
    /// an ordered map, so listings come back in id order.
    type Id: Ord + Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a new record.
    type Create: Send + Sync + Debug;

    /// Payload for in-place updates. Use an uninhabited enum for records that never change
    /// through the update path.
    type Update: Send + Sync + Debug;

    /// Criteria for `List` requests. `Default` must match every record.
    type Filter: Send + Sync + Debug + Default;

    /// Entity-specific operations (e.g. `Reserve`, `MarkDelivered`).
    type Action: Send + Sync + Debug;

    /// Result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into the actor. Use `()` if none are needed.
    type Context: Send + Sync;

    /// Error type for this entity.
    ///
    /// One enum per entity rather than one per action: clients match on a single type,
    /// at the cost of every action sharing the union of failure modes.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the full record from the generated id and the creation payload.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        ctx: &Self::Context,
    ) -> Result<Self, Self::Error>;

    /// Whether `self` would break a uniqueness rule if stored next to `existing`.
    fn conflicts_with(&self, _existing: &Self) -> bool {
        false
    }

    /// Whether this record is selected by `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the record is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update payload.
    async fn on_update(&mut self, update: Self::Update, ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Called before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle an entity-specific action. The record is only written back if the handler
    /// mutates `self`; on error the handler is responsible for leaving `self` unchanged.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
