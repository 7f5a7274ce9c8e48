//! # Entropy Adapters
//!
//! `WeakEntropy` is the production default: a Keccak-256 digest of the
//! draw material, which consists only of locally available call data. A
//! caller who controls transaction ordering can grind that material, so
//! raffle outcomes are biasable — a documented limitation of this design,
//! kept deliberately rather than silently upgraded.
//!
//! `FixedEntropy` pins the draw for deterministic tests.

use crate::ports::outbound::EntropySource;
use sha3::{Digest, Keccak256};
use shared_types::U256;

/// Keccak-based entropy over the draw material.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeakEntropy;

impl EntropySource for WeakEntropy {
    fn draw(&mut self, material: &[u8]) -> U256 {
        let digest = Keccak256::digest(material);
        U256::from_big_endian(&digest)
    }
}

/// Entropy source returning a constant value. Test-wiring only.
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(U256);

impl FixedEntropy {
    /// Creates a source that always draws `value`.
    #[must_use]
    pub fn new(value: U256) -> Self {
        Self(value)
    }
}

impl EntropySource for FixedEntropy {
    fn draw(&mut self, _material: &[u8]) -> U256 {
        self.0
    }
}
