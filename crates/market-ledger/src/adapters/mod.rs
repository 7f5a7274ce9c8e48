//! # Adapters Layer
//!
//! Concrete implementations of the outbound ports: the in-memory asset
//! registry and the entropy sources.

pub mod entropy;
pub mod memory_registry;

pub use entropy::{FixedEntropy, WeakEntropy};
pub use memory_registry::InMemoryAssetRegistry;
