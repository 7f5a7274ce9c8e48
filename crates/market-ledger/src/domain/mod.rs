//! # Domain Layer
//!
//! Pure marketplace logic: entities, errors, settlement arithmetic and the
//! `Marketplace` aggregate. No I/O; the only external reach is through the
//! outbound ports the aggregate holds.

pub mod auction;
pub mod entities;
pub mod errors;
pub mod ledger;
pub mod loan;
pub mod raffle;
pub mod sale;
pub mod settlement;

pub use auction::AUCTION_EXTENSION_SECS;
pub use entities::*;
pub use errors::LedgerError;
pub use ledger::Marketplace;
pub use settlement::{platform_fee, split_payment, SettlementSplit};
