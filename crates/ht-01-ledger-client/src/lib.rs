//! HT-01 Ledger Client - connection lifecycle and transaction paths to the
//! provenance ledger network.
//!
//! This crate owns the single logical connection and signing identity the
//! process holds against the ledger. Everything above it (the transaction
//! gateway) talks to the network exclusively through [`LedgerClient`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  LEDGER CLIENT (ht-01)                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌───────────────┐   ┌──────────────┐  │
//! │  │   Wallet   │   │  Connection   │   │ Reachability │  │
//! │  │ (identity) │   │   Profile     │   │    Probe     │  │
//! │  └─────┬──────┘   └──────┬────────┘   └──────┬───────┘  │
//! │        │                 │                   │           │
//! │  ┌─────┴─────────────────┴───────────────────┴────────┐  │
//! │  │                  LedgerClient                      │  │
//! │  │   connect / submit / evaluate / resolve_block      │  │
//! │  └────────────────────────┬───────────────────────────┘  │
//! │                           │ LedgerRpc port               │
//! │         ┌─────────────────┴──────────────────┐           │
//! │         ▼                                    ▼           │
//! │   HttpLedgerRpc                      InMemoryLedger      │
//! │   (peer endpoints)                   (tests / demos)     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! - At most one live connection per process; `connect` is idempotent while
//!   a connection exists and `disconnect` is a safe no-op when there is none.
//! - `connect`/`disconnect` are mutually exclusive with in-flight
//!   `submit`/`evaluate` calls; concurrent submissions on an established
//!   connection proceed in parallel.
//! - Transaction identifiers are derived before network broadcast, so an
//!   in-flight submission is cancel-safe up to the broadcast await point.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod ports;
pub mod probe;

// Re-exports for public API
pub use adapters::http::HttpLedgerRpc;
pub use adapters::memory::InMemoryLedger;
pub use client::{Connection, LedgerClient};
pub use domain::identity::{LedgerIdentity, Wallet};
pub use domain::profile::{CaEndpoint, ConnectionProfile, Organization, PeerEndpoint};
pub use ports::identity::{DevelopmentEnrollment, IdentityProvider};
pub use ports::rpc::{LedgerRpc, TxProof};
pub use probe::ReachabilityProbe;
