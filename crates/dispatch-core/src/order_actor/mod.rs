//! # Order Store
//!
//! Holds customer orders and drives them through matching and the delivery lifecycle.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](dispatch_actor::ActorEntity) implementation for
//!   [`Order`] and its [`OrderContext`]
//! - [`error`] - [`OrderError`]
//! - [`actions`] - [`OrderAction`], [`OrderActionResult`] and [`MatchOutcome`]
//! - `matching` - the match orchestration behind [`OrderAction::Match`]
//!
//! ## Orchestration
//!
//! Like an order reserving stock before it is accepted, a match reserves a partner slot
//! before the order changes. The order actor talks to its dependencies from inside its
//! own message loop:
//!
//! ```text
//! OrderAction::Match
//!   -> PartnerClient::list_partners(area)     candidates
//!   -> matcher::select                        pure choice or failure reason
//!   -> PartnerClient::reserve                 compare-and-increment, may lose a race
//!   -> LedgerClient::append                   success entry, unique per round
//!   -> order becomes `assigned`
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dispatch_core::clock::system_clock;
//! use dispatch_core::model::{Customer, OrderCreate, OrderItem};
//! use dispatch_core::order_actor::{self, OrderContext};
//! use dispatch_core::{ledger_actor, partner_actor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (partner_actor, partners) = partner_actor::new(8);
//!     let (ledger_actor, ledger) = ledger_actor::new(8);
//!     let (order_actor, orders) = order_actor::new(8);
//!     tokio::spawn(partner_actor.run(system_clock()));
//!     tokio::spawn(ledger_actor.run(system_clock()));
//!     tokio::spawn(order_actor.run(OrderContext {
//!         partners,
//!         ledger,
//!         clock: system_clock(),
//!         capacity_ceiling: 3,
//!     }));
//!
//!     let id = orders
//!         .place_order(OrderCreate {
//!             customer: Customer {
//!                 name: "Ravi".into(),
//!                 phone: "555-0199".into(),
//!                 address: "12 Lake Rd".into(),
//!             },
//!             area: "Harbour".into(),
//!             items: vec![OrderItem { name: "Rice".into(), quantity: 2, unit_price_cents: 450 }],
//!             scheduled_for: chrono::Utc::now(),
//!             declared_total_cents: Some(900),
//!         })
//!         .await?;
//!
//!     // Nobody serves the area yet: recorded on the ledger, order stays pending.
//!     let outcome = orders.match_order(id).await?;
//!     assert!(outcome.partner().is_none());
//!     Ok(())
//! }
//! ```

mod actions;
pub mod entity;
pub mod error;
mod matching;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use dispatch_actor::ResourceActor;

/// Creates a new Order actor and its client. Run it with an [`OrderContext`].
pub fn new(mailbox_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(mailbox_size);
    (actor, OrderClient::new(generic_client))
}
