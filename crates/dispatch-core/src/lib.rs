//! # Dispatch Core
//!
//! Order-to-partner assignment engine for a delivery operation: partner directory, order
//! store and assignment ledger as actors, the matcher that picks a partner for an order,
//! the order lifecycle, and the metrics derived from all three stores.
//!
//! Start with [`runtime::DispatchSystem`]; the store actors and their clients are public
//! for wiring in tests.

pub mod clients;
pub mod clock;
pub mod config;
pub mod ledger_actor;
pub mod lifecycle;
pub mod matcher;
pub mod metrics;
pub mod model;
pub mod order_actor;
pub mod partner_actor;
pub mod runtime;
