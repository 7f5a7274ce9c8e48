//! # Error Types
//!
//! Every guard failure aborts the whole call with no partial state change
//! and surfaces one of these stable kinds. There is no local recovery; a
//! caller that can retry (e.g. resubmitting an auction settlement once the
//! deadline truly passes) does so itself.

use crate::ports::outbound::RegistryError;
use shared_types::{BasisPoints, ItemId, PositionId, Timestamp, U256};
use thiserror::Error;

/// Errors surfaced by the marketplace ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the role the operation requires.
    #[error("caller is not the position owner")]
    NotOwner,

    /// Position is not in a state the operation accepts.
    #[error("position state does not allow this operation")]
    InvalidStateForOperation,

    /// Time guard: the terminating call arrived before the deadline.
    #[error("deadline not reached: {now} < {deadline}")]
    DeadlineNotReached {
        /// The position's deadline.
        deadline: Timestamp,
        /// Call time.
        now: Timestamp,
    },

    /// Time guard: the accepting call arrived after the deadline.
    #[error("deadline passed: {now} >= {deadline}")]
    DeadlinePassed {
        /// The position's deadline.
        deadline: Timestamp,
        /// Call time.
        now: Timestamp,
    },

    /// Attached payment does not match the exact amount required.
    #[error("incorrect payment: expected {expected}, got {actual}")]
    IncorrectPayment {
        /// Amount the operation requires.
        expected: U256,
        /// Amount attached to the call.
        actual: U256,
    },

    /// Bid does not clear the minimum bid or the current highest bid.
    #[error("bid too low: {bid} does not clear {required}")]
    BidTooLow {
        /// The caller's resulting total bid.
        bid: U256,
        /// Amount the bid had to clear.
        required: U256,
    },

    /// A payment-carrying call arrived with zero payment.
    #[error("payment cannot be zero")]
    ZeroPayment,

    /// A quantity argument was zero.
    #[error("amount cannot be zero")]
    ZeroAmount,

    /// Caller's available units fall short of the requested quantity.
    #[error("insufficient available units: requested {requested}, available {available}")]
    InsufficientAvailableUnits {
        /// Units the operation needed.
        requested: U256,
        /// Units actually available to the caller.
        available: U256,
    },

    /// Item already registered and the caller holds nothing to reconcile.
    #[error("item already registered: {0}")]
    DuplicateItem(ItemId),

    /// No item with this id.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// No position with this id.
    #[error("unknown position: {0}")]
    UnknownPosition(PositionId),

    /// The marketplace has been retired; no new listings.
    #[error("marketplace already retired")]
    AlreadyRetired,

    /// Migration snapshots require the retired latch to be set first.
    #[error("marketplace not retired")]
    NotRetired,

    /// Snapshot page number outside the valid range.
    #[error("page {page} out of bounds ({total_pages} pages)")]
    PageOutOfBounds {
        /// Requested page (1-based).
        page: usize,
        /// Number of pages actually available.
        total_pages: usize,
    },

    /// Caller has no pending balance.
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    /// Configured fee rate above the hard cap.
    #[error("fee of {0} bps out of range")]
    FeeOutOfRange(BasisPoints),

    /// The zero address is not a valid argument here.
    #[error("zero address not allowed")]
    ZeroAddress,

    /// Quantity arithmetic overflowed 256 bits.
    #[error("amount arithmetic overflow")]
    AmountOverflow,

    /// Asset registry rejected a transfer or query.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
}
