//! # Market Ledger - Position State Machine & Settlement
//!
//! ## Purpose
//!
//! Tracks fractional quantities of semi-fungible assets through five
//! mutually exclusive market states — Available, RegularSale, Auction,
//! Raffle, Loan — and settles every sale-like outcome (royalty, platform
//! fee, seller proceeds) atomically into a pull-payment balance map.
//!
//! ## Execution model
//!
//! Entry points take a [`shared_types::TxContext`] fixed by the execution
//! environment and run strictly serially. Deadlines are plain comparison
//! guards evaluated inside the terminating call (`end_auction`,
//! `end_raffle`, `liquidate_loan`); nothing runs in the background, and a
//! position past its deadline simply waits for any caller to settle it.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | All-or-nothing calls | guards precede mutation in every entry point |
//! | Settlement conservation | `domain/settlement.rs` split arithmetic |
//! | Fee snapshotting | rate copied onto positions at creation |
//! | Pull payments only | `Marketplace::withdraw` is the sole debit path |
//! | Index consistency | arena and indices mutate in the same call |
//!
//! ## Usage Example
//!
//! ```
//! use market_ledger::prelude::*;
//! use shared_types::{Address, TxContext, U256};
//!
//! let seller = Address::new([1u8; 20]);
//! let config = MarketConfig::new(Address::new([0xEE; 20]), Address::new([0xFF; 20]), 250);
//! let mut market = Marketplace::new(
//!     config,
//!     InMemoryAssetRegistry::new(),
//!     Box::new(WeakEntropy::default()),
//! );
//!
//! let token = market.registry_mut().mint(seller, U256::from(10), None);
//! let ctx = TxContext::new(seller, 0);
//! let (item_id, position_id) = market
//!     .register_and_list(&ctx, Address::new([0xAA; 20]), token, U256::from(10), U256::from(50))
//!     .unwrap();
//! assert_eq!(market.item(item_id).unwrap().position_count, 2);
//! assert_eq!(market.position(position_id).unwrap().amount, U256::from(10));
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod events;
pub mod ports;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        AuctionData, FeeTable, Item, LoanData, MarketConfig, Position, PositionKind,
        PositionState, RaffleData, Sale, MAX_FEE_BPS,
    };

    // The aggregate and its constants
    pub use crate::domain::auction::AUCTION_EXTENSION_SECS;
    pub use crate::domain::ledger::Marketplace;

    // Settlement arithmetic
    pub use crate::domain::settlement::{platform_fee, split_payment, SettlementSplit};

    // Errors
    pub use crate::domain::errors::LedgerError;

    // Events
    pub use crate::events::MarketEvent;

    // Ports
    pub use crate::ports::outbound::{AssetRegistry, EntropySource, RegistryError};

    // Adapters
    pub use crate::adapters::{FixedEntropy, InMemoryAssetRegistry, WeakEntropy};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
