//! HT-03 Provenance - batch custody projection and next-step coordination.
//!
//! Interprets accepted ledger transactions as batch-state transitions and
//! maintains the query-able per-batch view of custody progress. This is a
//! read-side cache: the ledger stays the source of truth for validity, so
//! out-of-order writes are accepted (and flagged) rather than rejected.
//!
//! # State machine (per batch)
//!
//! ```text
//! empty ──RecordCollectionEvent──▶ collection
//!       ──QualityAttestation────▶ quality
//!       ──TransferCustody───────▶ processing
//!       ──BatchCreation─────────▶ manufacturing (terminal)
//! ```
//!
//! Transitions happen only through [`BatchProjector::apply`], only in the
//! listed order; no transition removes a completed stage, and replays of an
//! already-recorded stage are idempotent no-ops.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod coordinator;
pub mod domain;
pub mod projector;

// Re-exports for public API
pub use coordinator::{next_stage, token_for, StepToken, TokenKind};
pub use projector::{ApplyOutcome, BatchProjector};
