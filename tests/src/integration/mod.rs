//! # Integration Tests
//!
//! Wire the marketplace ledger and the governance multisig together through
//! the gateway port and exercise the end-to-end flows.

pub mod governed_market;
pub mod scenarios;
pub mod support;
