//! # Core Domain Entities
//!
//! The marketplace's records: items, positions and their state payloads,
//! the fee table, and the marketplace configuration.

use serde::{Deserialize, Serialize};
use shared_types::{Address, BasisPoints, FeeKind, ItemId, PositionId, Timestamp, TokenId, U256};

// =============================================================================
// ITEM
// =============================================================================

/// One completed sale of an item's units (regular sale, auction or raffle).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Address that gave up the units.
    pub seller: Address,
    /// Address that received the units.
    pub buyer: Address,
    /// Unit quantity sold.
    pub amount: U256,
    /// Total payment for the sale.
    pub price: U256,
}

/// The marketplace's record of one minted asset line.
///
/// Created once, never deleted; `sales` and `position_count` grow
/// monotonically over the item's lifetime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    /// Unique, monotonic identifier.
    pub item_id: ItemId,
    /// Registry contract the token lives in.
    pub asset_contract: Address,
    /// Token identifier within the registry.
    pub token_id: TokenId,
    /// Address that registered the item. Immutable once set.
    pub creator: Address,
    /// Number of positions ever created for this item.
    pub position_count: u64,
    /// Append-only sale history.
    pub sales: Vec<Sale>,
}

// =============================================================================
// POSITION
// =============================================================================

/// Live auction payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionData {
    /// Bidding closes at this time; extended by late qualifying bids.
    pub deadline: Timestamp,
    /// Minimum acceptable first bid.
    pub min_bid: U256,
    /// Current leader, if any bid has been accepted.
    pub highest_bidder: Option<Address>,
    /// Leader's total escrowed contribution.
    pub highest_bid: U256,
}

/// Live raffle payload.
///
/// Entries merge per address; selection weighting uses each address's total
/// contribution over `total_value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaffleData {
    /// Entries close at this time.
    pub deadline: Timestamp,
    /// Sum of all entry payments.
    pub total_value: U256,
    /// Contribution per entrant, in entry order.
    pub entries: Vec<(Address, U256)>,
    /// Number of distinct entrants.
    pub total_addresses: u64,
}

/// Loan payload. `lender` is `None` until the proposal is funded; `deadline`
/// stays 0 until then.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanData {
    /// Principal the borrower receives on funding.
    pub loan_amount: U256,
    /// Premium owed on top of the principal at repayment.
    pub fee_amount: U256,
    /// Loan term, applied from the funding time.
    pub duration_minutes: u64,
    /// Repayment due by this time once funded; 0 while unfunded.
    pub deadline: Timestamp,
    /// Funding lender, once the loan is active.
    pub lender: Option<Address>,
}

/// Market state of a position, carrying the state-specific payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionState {
    /// Units registered with the marketplace but not committed anywhere;
    /// custody stays with the owner.
    Available,
    /// Fixed-price listing; units escrowed in market custody.
    RegularSale,
    /// Timed auction; units escrowed.
    Auction(AuctionData),
    /// Weighted-random raffle; units escrowed.
    Raffle(RaffleData),
    /// Collateralized loan (proposed or funded); collateral escrowed.
    Loan(LoanData),
}

/// Fieldless mirror of `PositionState`, used for indexing and filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionKind {
    /// See `PositionState::Available`.
    Available,
    /// See `PositionState::RegularSale`.
    RegularSale,
    /// See `PositionState::Auction`.
    Auction,
    /// See `PositionState::Raffle`.
    Raffle,
    /// See `PositionState::Loan`.
    Loan,
}

/// A quantity of one item's units in one market state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    /// Unique, monotonic identifier.
    pub position_id: PositionId,
    /// Item these units belong to.
    pub item_id: ItemId,
    /// Address entitled to the proceeds or responsible for the units.
    pub owner: Address,
    /// Unit quantity. Always > 0 while the position exists.
    pub amount: U256,
    /// Unit price for regular sales; zero for other states.
    pub price: U256,
    /// Fee rate snapshotted at creation. Later fee-table changes never
    /// touch open positions.
    pub market_fee_bps: BasisPoints,
    /// Current state and payload.
    pub state: PositionState,
}

impl Position {
    /// The fieldless kind of the current state.
    #[must_use]
    pub fn kind(&self) -> PositionKind {
        match self.state {
            PositionState::Available => PositionKind::Available,
            PositionState::RegularSale => PositionKind::RegularSale,
            PositionState::Auction(_) => PositionKind::Auction,
            PositionState::Raffle(_) => PositionKind::Raffle,
            PositionState::Loan(_) => PositionKind::Loan,
        }
    }
}

// =============================================================================
// FEES & CONFIGURATION
// =============================================================================

/// Hard cap on any configurable fee rate (50 %).
pub const MAX_FEE_BPS: BasisPoints = 5_000;

/// Fee rates per transaction type, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTable {
    /// Rate applied to regular sales.
    pub regular_sale: BasisPoints,
    /// Rate applied to auction settlements.
    pub auction: BasisPoints,
    /// Rate applied to raffle settlements.
    pub raffle: BasisPoints,
    /// Rate applied to loan principals at funding time.
    pub loan: BasisPoints,
}

impl FeeTable {
    /// A table charging the same rate for every transaction type.
    #[must_use]
    pub const fn uniform(fee_bps: BasisPoints) -> Self {
        Self {
            regular_sale: fee_bps,
            auction: fee_bps,
            raffle: fee_bps,
            loan: fee_bps,
        }
    }

    /// Current rate for one transaction type.
    #[must_use]
    pub fn rate(&self, kind: FeeKind) -> BasisPoints {
        match kind {
            FeeKind::RegularSale => self.regular_sale,
            FeeKind::Auction => self.auction,
            FeeKind::Raffle => self.raffle,
            FeeKind::Loan => self.loan,
        }
    }

    /// Replaces the rate for one transaction type.
    pub fn set(&mut self, kind: FeeKind, fee_bps: BasisPoints) {
        match kind {
            FeeKind::RegularSale => self.regular_sale = fee_bps,
            FeeKind::Auction => self.auction = fee_bps,
            FeeKind::Raffle => self.raffle = fee_bps,
            FeeKind::Loan => self.loan = fee_bps,
        }
    }
}

/// Marketplace configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketConfig {
    /// Platform owner; receives fee credits and holds the admin surface.
    pub owner: Address,
    /// Custody account in the asset registry for escrowed units.
    pub market_account: Address,
    /// Configurable fee table.
    pub fees: FeeTable,
    /// Successor contract for migration cutover, if wired.
    pub migrator: Option<Address>,
    /// One-way cutover latch. Once set, listing-creating entry points are
    /// rejected while settlement-completion paths stay live.
    pub retired: bool,
}

impl MarketConfig {
    /// Creates a configuration with a uniform fee rate and no migrator.
    #[must_use]
    pub fn new(owner: Address, market_account: Address, fee_bps: BasisPoints) -> Self {
        Self {
            owner,
            market_account,
            fees: FeeTable::uniform(fee_bps),
            migrator: None,
            retired: false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_kind_matches_state() {
        let mut position = Position {
            position_id: PositionId::new(1),
            item_id: ItemId::new(1),
            owner: Address::new([1u8; 20]),
            amount: U256::from(10),
            price: U256::zero(),
            market_fee_bps: 250,
            state: PositionState::Available,
        };
        assert_eq!(position.kind(), PositionKind::Available);

        position.state = PositionState::Loan(LoanData {
            loan_amount: U256::from(100),
            fee_amount: U256::from(10),
            duration_minutes: 60,
            deadline: 0,
            lender: None,
        });
        assert_eq!(position.kind(), PositionKind::Loan);
    }

    #[test]
    fn test_fee_table_uniform_and_set() {
        let mut fees = FeeTable::uniform(250);
        assert_eq!(fees.rate(FeeKind::Raffle), 250);

        fees.set(FeeKind::Loan, 100);
        assert_eq!(fees.rate(FeeKind::Loan), 100);
        assert_eq!(fees.rate(FeeKind::RegularSale), 250);
    }
}
