//! Domain clients: typed wrappers around each store's [`ResourceClient`](dispatch_actor::ResourceClient).
//!
//! These are the store interfaces the rest of the crate depends on. Tests swap the
//! underlying actor for a [`MockClient`](dispatch_actor::mock::MockClient).

pub mod ledger_client;
pub mod order_client;
pub mod partner_client;

pub use ledger_client::LedgerClient;
pub use order_client::OrderClient;
pub use partner_client::PartnerClient;
