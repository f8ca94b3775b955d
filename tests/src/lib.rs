//! # HerbTrace Test Suite
//!
//! Unified test crate for cross-crate scenarios.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── gateway_flow.rs     # invoke → audit → projection round trips
//!     ├── fallback_policy.rs  # strict vs demonstration fallback behavior
//!     └── concurrency.rs      # shared-state races across the stack
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p ht-tests
//!
//! # By category
//! cargo test -p ht-tests integration::gateway_flow
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
