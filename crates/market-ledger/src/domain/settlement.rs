//! # Settlement Arithmetic
//!
//! The three-way split applied to every sale-like settlement: royalty off
//! the gross first, platform fee on the remainder, seller keeps the rest.
//! Integer arithmetic throughout; the parts always sum exactly to the gross.

use shared_types::{Address, BasisPoints, BPS_DENOMINATOR, U256};

/// Outcome of splitting one gross payment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementSplit {
    /// Royalty receiver (zero address when no royalty applies).
    pub royalty_receiver: Address,
    /// Royalty amount, capped at the gross.
    pub royalty: U256,
    /// Platform fee, computed on the gross net of royalty.
    pub fee: U256,
    /// Remainder credited to the seller.
    pub seller_proceeds: U256,
}

/// Splits `gross` into royalty, platform fee and seller proceeds.
///
/// `royalty` comes from the registry's royalty terms and is capped at the
/// gross; `fee_bps` is the rate snapshotted on the position being settled.
#[must_use]
pub fn split_payment(
    gross: U256,
    royalty_receiver: Address,
    royalty: U256,
    fee_bps: BasisPoints,
) -> SettlementSplit {
    let royalty = royalty.min(gross);
    let net = gross - royalty;
    let fee = net * U256::from(fee_bps) / U256::from(BPS_DENOMINATOR);
    SettlementSplit {
        royalty_receiver,
        royalty,
        fee,
        seller_proceeds: net - fee,
    }
}

/// Platform fee on a plain amount, with no royalty leg (loan funding).
#[must_use]
pub fn platform_fee(amount: U256, fee_bps: BasisPoints) -> U256 {
    amount * U256::from(fee_bps) / U256::from(BPS_DENOMINATOR)
}
