//! HT-02 Transaction Gateway - the single entry point the rest of the
//! system uses to talk to the ledger.
//!
//! The gateway hides whether the network is currently reachable behind an
//! explicit, two-variant backend selected once at initialization:
//!
//! ```text
//!              initialize()
//!                   │
//!         ┌─────────┴──────────┐
//!         ▼                    ▼
//!   LedgerBackend::Real   LedgerBackend::Fallback
//!   (live connection)     (demo opt-in only)
//!         │                    │
//!         └────────┬───────────┘
//!                  ▼
//!        invoke / query / health
//!                  │
//!       audit log + batch projection
//!        (synchronous, before return)
//! ```
//!
//! With the strict policy (the default) a disconnected gateway returns
//! `ServiceUnavailable` instead of synthesizing anything: fabricated ledger
//! metadata would corrupt the audit trail. The demonstration fallback must
//! be opted into explicitly, and everything it produces is origin-tagged.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod audit;
pub mod backend;
pub mod domain;
pub mod metrics;
pub mod service;

// Re-exports for public API
pub use audit::TransactionLog;
pub use backend::{FallbackLedger, LedgerBackend};
pub use domain::config::{ConfigError, FallbackPolicy, GatewayConfig};
pub use domain::outcome::InvokeOutcome;
pub use metrics::GatewayMetrics;
pub use service::TransactionGateway;
