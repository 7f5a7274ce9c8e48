//! # Driven Ports (Outbound)
//!
//! Interfaces the ledger depends on. The asset registry owns token identity,
//! balances and royalty metadata; the ledger only consumes the capability
//! surface below. The entropy source feeds raffle winner selection.
//!
//! All ports are synchronous: calls into the ledger execute strictly
//! serially, so there is nothing to await.

use shared_types::{Address, TokenId, U256};
use thiserror::Error;

// =============================================================================
// ASSET REGISTRY
// =============================================================================

/// Errors surfaced by the asset registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Transfer exceeds the sender's token balance.
    #[error("insufficient token balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Units the transfer needed.
        required: U256,
        /// Units the sender actually holds.
        available: U256,
    },

    /// Token id has never been minted.
    #[error("unknown token: {0}")]
    UnknownToken(TokenId),
}

/// Capability interface onto the external asset registry.
///
/// Mint, approval and metadata management live in the registry itself; the
/// ledger only queries balances, moves units in and out of custody, and
/// looks up royalty terms at settlement time.
pub trait AssetRegistry {
    /// Units of `token` held by `owner`.
    fn balance_of(&self, owner: Address, token: TokenId) -> U256;

    /// Moves `amount` units of `token` from `from` to `to`.
    ///
    /// A failed transfer must leave registry balances untouched; the ledger
    /// aborts the whole call on error.
    fn transfer(
        &mut self,
        from: Address,
        to: Address,
        token: TokenId,
        amount: U256,
    ) -> Result<(), RegistryError>;

    /// Royalty terms for a sale of `token` at `sale_amount`.
    ///
    /// Returns the royalty receiver and the absolute royalty amount. A token
    /// without royalty terms returns `(Address::ZERO, 0)`.
    fn royalty_info(&self, token: TokenId, sale_amount: U256) -> (Address, U256);

    /// Total minted supply of `token`.
    fn supply_of(&self, token: TokenId) -> U256;
}

// =============================================================================
// ENTROPY SOURCE
// =============================================================================

/// Source of raffle-draw entropy.
///
/// The production adapter derives entropy from locally available call data
/// (see `adapters::entropy`), which a caller controlling transaction
/// ordering can bias. That weakness is inherited from the environment this
/// ledger models and is kept behind this port so a stronger source can be
/// swapped in deliberately.
pub trait EntropySource {
    /// Draws a 256-bit value from `material`.
    fn draw(&mut self, material: &[u8]) -> U256;
}
