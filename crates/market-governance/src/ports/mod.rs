//! # Ports Layer
//!
//! Trait definitions between the governance domain and the marketplace it
//! governs.

pub mod outbound;

pub use outbound::*;
