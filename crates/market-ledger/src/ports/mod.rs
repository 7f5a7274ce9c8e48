//! # Ports Layer
//!
//! Trait definitions between the ledger domain and the outside world.
//!
//! - **Driven Ports (Outbound)**: `AssetRegistry`, `EntropySource`
//! - No concrete implementations in this module

pub mod outbound;

pub use outbound::*;
