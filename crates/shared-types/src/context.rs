//! # Call Context
//!
//! Every ledger and governance entry point executes on behalf of a caller,
//! optionally carrying a payment, at a point in time fixed by the execution
//! environment. Calls are strictly serialized; "now" never advances within
//! a single call.

use crate::Address;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// Unix timestamp in seconds.
pub type Timestamp = u64;

/// Seconds per minute, for duration arguments expressed in minutes.
pub const SECONDS_PER_MINUTE: u64 = 60;

/// Execution context for a single entry-point call.
///
/// The environment authenticates the caller and escrows `payment` before the
/// call runs; the ledger only accounts for it.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TxContext {
    /// Authenticated caller address.
    pub caller: Address,
    /// Payment attached to the call, in the smallest currency unit.
    pub payment: U256,
    /// Call timestamp (unix seconds).
    pub now: Timestamp,
}

impl TxContext {
    /// Creates a context with no attached payment.
    #[must_use]
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self {
            caller,
            payment: U256::zero(),
            now,
        }
    }

    /// Creates a context carrying a payment.
    #[must_use]
    pub fn with_payment(caller: Address, payment: U256, now: Timestamp) -> Self {
        Self {
            caller,
            payment,
            now,
        }
    }
}
