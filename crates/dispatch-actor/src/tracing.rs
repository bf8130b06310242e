//! # Observability
//!
//! One-call setup for structured logging. The actor loop logs every request with an
//! `entity_type` field (`Order`, `Partner`, `AssignmentEntry`) and the record id, so the
//! default compact format hides module paths.
//!
//! ```bash
//! RUST_LOG=info cargo run                          # lifecycle, matches, transitions
//! RUST_LOG=debug cargo run                         # full payloads of every request
//! RUST_LOG=dispatch_actor=warn,dispatch_core=debug cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info"`) is used. Calling
/// this twice is harmless: the second installation attempt is ignored.
pub fn setup_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
