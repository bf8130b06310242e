//! Runtime orchestration.
//!
//! - [`DispatchSystem`] starts the partner directory, the ledger and the order store,
//!   wires them together and is the entry point for operators and the presentation layer.
//! - [`setup_tracing`] installs the log subscriber.

pub mod dispatch_system;

pub use dispatch_actor::setup_tracing;
pub use dispatch_system::*;
