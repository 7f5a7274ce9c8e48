//! # Error Types
//!
//! Stable error kinds for the governance protocol. Every guard failure
//! aborts the call with no partial state change.

use crate::ports::outbound::GatewayError;
use shared_types::ProposalId;
use thiserror::Error;

/// Errors surfaced by the governance multisig.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    /// Caller is not a current owner.
    #[error("caller is not an owner")]
    NotOwner,

    /// Caller already approved this proposal.
    #[error("proposal already approved by caller")]
    AlreadyApproved,

    /// Proposal has already been executed.
    #[error("proposal already executed")]
    AlreadyExecuted,

    /// Approvals from current owners fall short of the quorum.
    #[error("quorum not met: {approvals} of {quorum} required approvals")]
    QuorumNotMet {
        /// Live approvals counted at execution time.
        approvals: usize,
        /// Current quorum threshold.
        quorum: usize,
    },

    /// Proposer is at the active-proposal cap.
    #[error("too many active proposals for this owner (cap {0})")]
    TooManyActiveProposals(usize),

    /// No proposal with this id.
    #[error("unknown proposal: {0}")]
    UnknownProposal(ProposalId),

    /// The resulting quorum would be zero or exceed the owner count.
    #[error("invalid quorum {quorum} for {owners} owners")]
    InvalidQuorum {
        /// The quorum that would result.
        quorum: usize,
        /// The owner count it was checked against.
        owners: usize,
    },

    /// Owner-set addition of an address that is already an owner.
    #[error("address is already an owner")]
    DuplicateOwner,

    /// Owner-set removal of an address that is not an owner.
    #[error("address is not an owner")]
    UnknownOwner,

    /// Caller has no balance to withdraw.
    #[error("nothing to withdraw")]
    NothingToWithdraw,

    /// The marketplace gateway rejected a dispatched call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
