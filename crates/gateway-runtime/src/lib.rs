//! # HerbTrace Gateway Runtime
//!
//! The process entry point wiring the core together:
//!
//! 1. Load configuration (defaults + environment overrides)
//! 2. Open the wallet and enroll the signing identity if absent
//! 3. Build the ledger client over the HTTP transport
//! 4. Initialize the transaction gateway (probe → connect → backend)
//! 5. Spawn the periodic reachability probe
//! 6. Serve the HTTP surface
//!
//! The HTTP layer here is deliberately thin glue: every route maps directly
//! onto a gateway or projector call and serializes the result. Business
//! logic lives below, in the `ht-*` crates.

pub mod bootstrap;
pub mod config;
pub mod http;

pub use bootstrap::bootstrap;
pub use config::RuntimeConfig;
