//! Plain data types held by the stores. Each record type implements
//! [`ActorEntity`](dispatch_actor::ActorEntity) in its actor module.

pub mod assignment;
pub mod order;
pub mod partner;

pub use assignment::*;
pub use order::*;
pub use partner::*;
