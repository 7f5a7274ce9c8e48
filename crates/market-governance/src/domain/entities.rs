//! # Governance Entities
//!
//! Proposals are tagged variants sharing one approval/execution lifecycle,
//! so quorum counting exists exactly once regardless of what a proposal
//! carries.

use serde::{Deserialize, Serialize};
use shared_types::{Address, AdminCall, ProposalId, U256};
use std::collections::BTreeSet;

/// Cap on active (created, not yet executed) proposals per owner. Bounds
/// proposal spam without a fee mechanism.
pub const MAX_ACTIVE_PROPOSALS_PER_OWNER: usize = 10;

/// What a proposal does once executed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalPayload {
    /// A privileged marketplace call, optionally carrying funds.
    Transaction {
        /// Contract the call targets.
        target: Address,
        /// Funds forwarded with the call.
        value: U256,
        /// The privileged call itself.
        call: AdminCall,
    },
    /// Add or remove one owner.
    OwnerChange {
        /// The owner being added or removed.
        address: Address,
        /// True to add, false to remove.
        add: bool,
    },
    /// Replace the quorum threshold.
    QuorumChange {
        /// The new threshold.
        new_quorum: usize,
    },
}

/// One proposal in its lifecycle: proposed (implicit self-approval),
/// approved up to quorum, executed exactly once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    /// Unique, monotonic identifier.
    pub id: ProposalId,
    /// Owner who created the proposal.
    pub proposer: Address,
    /// Owners who have approved (always contains the proposer).
    pub approvals: BTreeSet<Address>,
    /// Set once by a successful `execute`; irreversible.
    pub executed: bool,
    /// What executing the proposal does.
    pub payload: ProposalPayload,
}

impl Proposal {
    /// True while the proposal still counts against its proposer's cap.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.executed
    }
}
