//! # Privileged Call Payloads
//!
//! Typed payloads for the marketplace's owner-only entry points. The
//! governance multisig carries these inside transaction proposals and
//! dispatches them through its marketplace gateway once quorum is reached.

use crate::{Address, BasisPoints, FeeKind};
use serde::{Deserialize, Serialize};

/// A privileged marketplace call.
///
/// One variant per owner-only entry point; the gateway translates the
/// variant into the concrete ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminCall {
    /// Change the fee rate for one transaction type. Open positions keep
    /// their snapshotted rate.
    SetMarketFee {
        /// Transaction type whose rate changes.
        kind: FeeKind,
        /// New rate in basis points.
        fee_bps: BasisPoints,
    },
    /// Rewire the migration target contract (None disables migration).
    SetMigrator {
        /// Successor contract address, if any.
        migrator: Option<Address>,
    },
    /// Transfer marketplace ownership (and with it, fee custody).
    TransferOwnership {
        /// New platform owner.
        new_owner: Address,
    },
    /// Latch the marketplace retired: no new listings, open positions may
    /// still resolve.
    Retire,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_call_round_trips_through_serde() {
        let call = AdminCall::SetMarketFee {
            kind: FeeKind::Auction,
            fee_bps: 250,
        };
        let json = serde_json::to_string(&call).unwrap();
        let back: AdminCall = serde_json::from_str(&json).unwrap();
        assert_eq!(call, back);
    }
}
