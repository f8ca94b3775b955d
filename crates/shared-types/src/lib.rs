//! # Shared Types Crate
//!
//! Cross-crate domain entities and error types for the HerbTrace
//! provenance gateway.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all types that cross a crate boundary
//!   (gateway ↔ projector ↔ runtime) are defined here.
//! - **Structural Origin Tagging**: `Origin` and `BlockRef` are carried
//!   inside every result envelope, so a synthesized or estimated value can
//!   never masquerade as an authoritative ledger record.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
