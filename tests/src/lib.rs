//! # Fraction Market Test Suite
//!
//! Unified test crate containing:
//!
//! ```text
//! tests/src/
//! └── integration/      # Cross-crate scenarios
//!     ├── support.rs    # Ledger-backed gateway + wiring helpers
//!     ├── governed_market.rs
//!     └── scenarios.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p market-tests
//!
//! # By category
//! cargo test -p market-tests integration::
//! ```

#![allow(dead_code)]

pub mod integration;
