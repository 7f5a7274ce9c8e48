//! # Fee Units
//!
//! Fee rates are integers in basis points (1/10000). Each position snapshots
//! the rate for its transaction type at creation time, so later rate changes
//! never retroactively alter open positions.

use serde::{Deserialize, Serialize};

/// Fee rate in basis points.
pub type BasisPoints = u16;

/// Denominator for basis-point arithmetic (1 bps = 1/10000).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Transaction type keying the configurable fee table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeKind {
    /// Fixed-price listing.
    RegularSale,
    /// Timed auction.
    Auction,
    /// Weighted-random raffle.
    Raffle,
    /// Collateralized loan.
    Loan,
}

impl FeeKind {
    /// All fee kinds, for table initialization.
    pub const ALL: [FeeKind; 4] = [
        FeeKind::RegularSale,
        FeeKind::Auction,
        FeeKind::Raffle,
        FeeKind::Loan,
    ];
}
