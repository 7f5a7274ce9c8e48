//! # Event Journal
//!
//! Every entry point appends typed records to an append-only journal; this
//! is the surface off-chain indexers consume. Composite register-and-open
//! calls emit their records in a fixed, documented order: the item
//! registration record comes first, any Available-import record follows,
//! and the opened position's record is always the last of the call, so
//! consumers can rely on positional reads.

use crate::domain::entities::PositionKind;
use serde::{Deserialize, Serialize};
use shared_types::{Address, BasisPoints, FeeKind, ItemId, PositionId, Timestamp, TokenId, U256};

/// One journal record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketEvent {
    /// A new item entered the marketplace.
    ItemRegistered {
        /// Identifier assigned to the item.
        item_id: ItemId,
        /// Registry contract holding the token.
        asset_contract: Address,
        /// Token identifier within the registry.
        token_id: TokenId,
        /// Registering address.
        creator: Address,
    },
    /// A new position was created (any state, including Available imports).
    PositionCreated {
        /// Identifier assigned to the position.
        position_id: PositionId,
        /// Item the position belongs to.
        item_id: ItemId,
        /// Position owner.
        owner: Address,
        /// Unit quantity.
        amount: U256,
        /// State the position was created in.
        kind: PositionKind,
    },
    /// An open position returned to Available (unlist or cancel).
    PositionUnlisted {
        /// The position that was unlisted.
        position_id: PositionId,
        /// Item the position belongs to.
        item_id: ItemId,
    },
    /// A sale settled (regular sale, auction or raffle).
    SaleCompleted {
        /// Item sold.
        item_id: ItemId,
        /// Position that settled.
        position_id: PositionId,
        /// Seller address.
        seller: Address,
        /// Buyer (or auction winner / raffle winner) address.
        buyer: Address,
        /// Units transferred.
        amount: U256,
        /// Total payment.
        price: U256,
    },
    /// A qualifying bid was accepted.
    BidPlaced {
        /// Auction position.
        position_id: PositionId,
        /// New highest bidder.
        bidder: Address,
        /// Bidder's total contribution after this bid.
        total_bid: U256,
        /// Deadline after any anti-snipe extension.
        deadline: Timestamp,
    },
    /// A raffle entry was accepted.
    RaffleEntered {
        /// Raffle position.
        position_id: PositionId,
        /// Entrant address.
        entrant: Address,
        /// This entry's payment.
        payment: U256,
        /// Pot size after this entry.
        total_value: U256,
    },
    /// A loan proposal was funded.
    LoanFunded {
        /// Loan position.
        position_id: PositionId,
        /// Funding lender.
        lender: Address,
        /// Repayment deadline.
        deadline: Timestamp,
    },
    /// A funded loan was repaid and its collateral released.
    LoanRepaid {
        /// Loan position.
        position_id: PositionId,
        /// Borrower who repaid.
        borrower: Address,
        /// Lender credited with the repayment.
        lender: Address,
        /// Total repayment (principal plus premium).
        payment: U256,
    },
    /// A defaulted loan's collateral went to the lender.
    LoanLiquidated {
        /// Loan position.
        position_id: PositionId,
        /// Lender who kept the collateral.
        lender: Address,
    },
    /// A pending balance was withdrawn.
    BalanceWithdrawn {
        /// Balance owner.
        owner: Address,
        /// Amount debited.
        amount: U256,
    },
    /// The fee table changed for one transaction type.
    FeeChanged {
        /// Transaction type affected.
        kind: FeeKind,
        /// New rate.
        fee_bps: BasisPoints,
    },
    /// The migration target was rewired.
    MigratorChanged {
        /// New migration target, if any.
        migrator: Option<Address>,
    },
    /// Platform ownership moved.
    OwnershipTransferred {
        /// Previous platform owner.
        previous_owner: Address,
        /// New platform owner.
        new_owner: Address,
    },
    /// The retired latch was set.
    MarketRetired,
}
