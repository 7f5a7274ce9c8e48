//! # Shared Types
//!
//! Value objects shared by the marketplace ledger and the governance
//! multisig. Everything in this crate is a pure value: no I/O, no state,
//! no dependencies beyond serialization and numeric primitives.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod admin;
pub mod context;
pub mod fees;
pub mod ids;

pub use address::Address;
pub use admin::AdminCall;
pub use context::{Timestamp, TxContext, SECONDS_PER_MINUTE};
pub use fees::{BasisPoints, FeeKind, BPS_DENOMINATOR};
pub use ids::{ItemId, PositionId, ProposalId, TokenId};

// Re-export U256 from primitive-types for 256-bit arithmetic
pub use primitive_types::U256;
