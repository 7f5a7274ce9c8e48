//! # Market Governance - Owner-Quorum Multisig
//!
//! ## Purpose
//!
//! Gates the marketplace's privileged configuration surface — fee rates,
//! contract wiring, ownership transfer, retirement — behind an owner-quorum
//! approval protocol, and distributes accrued platform fees across owners.
//!
//! ## Protocol
//!
//! Three proposal families share one lifecycle: proposed by an owner
//! (implicit self-approval), approved by other owners, executed exactly
//! once after quorum. Privileged calls reach the marketplace through the
//! [`ports::outbound::MarketplaceGateway`] port; the quorum logic never
//! touches ledger types directly.
//!
//! ## Usage Example
//!
//! ```
//! use market_governance::prelude::*;
//! use shared_types::{Address, TxContext, U256};
//!
//! let owners = vec![
//!     Address::new([1u8; 20]),
//!     Address::new([2u8; 20]),
//!     Address::new([3u8; 20]),
//! ];
//! let multisig = GovernanceMultisig::new(owners, 2).unwrap();
//! assert_eq!(multisig.quorum(), 2);
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod domain;
pub mod ports;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Proposal, ProposalPayload, MAX_ACTIVE_PROPOSALS_PER_OWNER,
    };

    // The aggregate
    pub use crate::domain::multisig::GovernanceMultisig;

    // Errors
    pub use crate::domain::errors::GovernanceError;

    // Ports
    pub use crate::ports::outbound::{GatewayError, MarketplaceGateway};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
