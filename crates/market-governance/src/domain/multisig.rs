//! # Governance Multisig
//!
//! Owner set, quorum threshold and the proposal lifecycle. Three proposal
//! families share one approval/execution path; only the executed payload
//! differs. Privileged marketplace calls dispatch through the
//! `MarketplaceGateway` port once quorum is reached.
//!
//! Quorum and owner-set consistency (`1 <= quorum <= |owners|`) is
//! validated at execution time: approvals accumulate while the owner set
//! may still change, so only execution sees the final state. Live
//! approvals are counted against the *current* owner set, so an approver
//! removed in the meantime no longer counts toward quorum.

use crate::domain::entities::{Proposal, ProposalPayload, MAX_ACTIVE_PROPOSALS_PER_OWNER};
use crate::domain::errors::GovernanceError;
use crate::ports::outbound::MarketplaceGateway;
use shared_types::{Address, AdminCall, ProposalId, TxContext, U256};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// The governance multisig.
#[derive(Debug)]
pub struct GovernanceMultisig {
    /// Current owners, in admission order.
    owners: Vec<Address>,
    /// Approvals required before a proposal may execute.
    quorum: usize,
    /// All proposals ever created, keyed by id.
    proposals: BTreeMap<ProposalId, Proposal>,
    /// Active (unexecuted) proposal count per proposer.
    active_per_owner: HashMap<Address, usize>,
    /// Withdrawable fee shares per owner.
    balances: HashMap<Address, U256>,
    /// Undistributed remainder from uneven fee splits. Stays in custody;
    /// documented behavior, not a leak.
    treasury: U256,
    /// Last assigned proposal id.
    current_proposal_id: u64,
}

impl GovernanceMultisig {
    /// Creates a multisig with the given owners and quorum.
    ///
    /// The owner list must be non-empty and duplicate-free, and the quorum
    /// must satisfy `1 <= quorum <= |owners|`.
    pub fn new(owners: Vec<Address>, quorum: usize) -> Result<Self, GovernanceError> {
        let distinct: BTreeSet<_> = owners.iter().copied().collect();
        if distinct.len() != owners.len() {
            return Err(GovernanceError::DuplicateOwner);
        }
        if quorum == 0 || quorum > owners.len() {
            return Err(GovernanceError::InvalidQuorum {
                quorum,
                owners: owners.len(),
            });
        }
        Ok(Self {
            owners,
            quorum,
            proposals: BTreeMap::new(),
            active_per_owner: HashMap::new(),
            balances: HashMap::new(),
            treasury: U256::zero(),
            current_proposal_id: 0,
        })
    }

    // =========================================================================
    // PROPOSAL LIFECYCLE
    // =========================================================================

    /// Proposes a privileged marketplace call.
    pub fn propose_transaction(
        &mut self,
        ctx: &TxContext,
        target: Address,
        value: U256,
        call: AdminCall,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose(
            ctx,
            ProposalPayload::Transaction {
                target,
                value,
                call,
            },
        )
    }

    /// Proposes adding (`add = true`) or removing an owner.
    pub fn propose_owner_change(
        &mut self,
        ctx: &TxContext,
        address: Address,
        add: bool,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose(ctx, ProposalPayload::OwnerChange { address, add })
    }

    /// Proposes a new quorum threshold.
    pub fn propose_quorum_change(
        &mut self,
        ctx: &TxContext,
        new_quorum: usize,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose(ctx, ProposalPayload::QuorumChange { new_quorum })
    }

    fn propose(
        &mut self,
        ctx: &TxContext,
        payload: ProposalPayload,
    ) -> Result<ProposalId, GovernanceError> {
        self.only_owner(ctx)?;
        let active = self
            .active_per_owner
            .get(&ctx.caller)
            .copied()
            .unwrap_or(0);
        if active >= MAX_ACTIVE_PROPOSALS_PER_OWNER {
            return Err(GovernanceError::TooManyActiveProposals(
                MAX_ACTIVE_PROPOSALS_PER_OWNER,
            ));
        }

        self.current_proposal_id += 1;
        let id = ProposalId::new(self.current_proposal_id);
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: ctx.caller,
                approvals: BTreeSet::from([ctx.caller]),
                executed: false,
                payload,
            },
        );
        *self.active_per_owner.entry(ctx.caller).or_insert(0) = active + 1;
        info!(proposal_id = %id, proposer = %ctx.caller, "proposal created");
        Ok(id)
    }

    /// Approves a proposal. The proposer's approval is implicit at
    /// creation; every other owner approves at most once.
    pub fn approve(&mut self, ctx: &TxContext, id: ProposalId) -> Result<(), GovernanceError> {
        self.only_owner(ctx)?;
        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }
        if !proposal.approvals.insert(ctx.caller) {
            return Err(GovernanceError::AlreadyApproved);
        }
        debug!(proposal_id = %id, approver = %ctx.caller, "proposal approved");
        Ok(())
    }

    /// Executes a proposal once quorum is reached. Any owner may trigger
    /// execution; the `executed` latch guarantees exactly-once semantics.
    pub fn execute(
        &mut self,
        ctx: &TxContext,
        id: ProposalId,
        gateway: &mut dyn MarketplaceGateway,
    ) -> Result<(), GovernanceError> {
        self.only_owner(ctx)?;
        let proposal = self
            .proposals
            .get(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted);
        }
        let live_approvals = proposal
            .approvals
            .iter()
            .filter(|approver| self.owners.contains(approver))
            .count();
        if live_approvals < self.quorum {
            return Err(GovernanceError::QuorumNotMet {
                approvals: live_approvals,
                quorum: self.quorum,
            });
        }

        // Validate and apply the payload before flipping the latch, so a
        // rejected payload leaves the proposal pending rather than burnt.
        let payload = proposal.payload.clone();
        let proposer = proposal.proposer;
        match payload {
            ProposalPayload::Transaction { value, call, .. } => {
                gateway.execute_admin(&call, value)?;
            }
            ProposalPayload::OwnerChange { address, add } => {
                self.apply_owner_change(address, add)?;
            }
            ProposalPayload::QuorumChange { new_quorum } => {
                if new_quorum == 0 || new_quorum > self.owners.len() {
                    return Err(GovernanceError::InvalidQuorum {
                        quorum: new_quorum,
                        owners: self.owners.len(),
                    });
                }
                self.quorum = new_quorum;
            }
        }

        let proposal = self
            .proposals
            .get_mut(&id)
            .ok_or(GovernanceError::UnknownProposal(id))?;
        proposal.executed = true;
        if let Some(active) = self.active_per_owner.get_mut(&proposer) {
            *active = active.saturating_sub(1);
        }
        info!(proposal_id = %id, executor = %ctx.caller, "proposal executed");
        Ok(())
    }

    fn apply_owner_change(&mut self, address: Address, add: bool) -> Result<(), GovernanceError> {
        if add {
            if self.owners.contains(&address) {
                return Err(GovernanceError::DuplicateOwner);
            }
            self.owners.push(address);
        } else {
            let index = self
                .owners
                .iter()
                .position(|owner| *owner == address)
                .ok_or(GovernanceError::UnknownOwner)?;
            if self.quorum > self.owners.len() - 1 {
                return Err(GovernanceError::InvalidQuorum {
                    quorum: self.quorum,
                    owners: self.owners.len() - 1,
                });
            }
            self.owners.remove(index);
        }
        Ok(())
    }

    // =========================================================================
    // FEE WITHDRAWAL FLOW
    // =========================================================================

    /// Pulls the governance component's accrued marketplace balance and
    /// splits it evenly across current owners.
    ///
    /// Owner-only but quorum-free: an operational action, not a
    /// configuration change. The indivisible remainder stays in governance
    /// custody.
    pub fn pull_from_marketplace(
        &mut self,
        ctx: &TxContext,
        gateway: &mut dyn MarketplaceGateway,
    ) -> Result<U256, GovernanceError> {
        self.only_owner(ctx)?;
        let amount = gateway.withdraw_accrued()?;
        let owner_count = U256::from(self.owners.len() as u64);
        let share = amount / owner_count;
        for owner in &self.owners {
            let balance = self.balances.entry(*owner).or_default();
            *balance = balance.saturating_add(share);
        }
        let remainder = amount - share * owner_count;
        self.treasury = self.treasury.saturating_add(remainder);
        info!(
            puller = %ctx.caller,
            amount = %amount,
            share = %share,
            remainder = %remainder,
            "marketplace fees pulled and split"
        );
        Ok(amount)
    }

    /// Withdraws the caller's own fee share.
    pub fn withdraw(&mut self, ctx: &TxContext) -> Result<U256, GovernanceError> {
        let amount = self
            .balances
            .remove(&ctx.caller)
            .filter(|amount| !amount.is_zero())
            .ok_or(GovernanceError::NothingToWithdraw)?;
        info!(owner = %ctx.caller, amount = %amount, "fee share withdrawn");
        Ok(amount)
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    /// Current owners, in admission order.
    #[must_use]
    pub fn owners(&self) -> &[Address] {
        &self.owners
    }

    /// Current quorum threshold.
    #[must_use]
    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// The proposal with this id.
    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(&id)
            .ok_or(GovernanceError::UnknownProposal(id))
    }

    /// Number of proposals ever created.
    #[must_use]
    pub fn proposal_count(&self) -> usize {
        self.proposals.len()
    }

    /// Active (unexecuted) proposals created by `owner`.
    #[must_use]
    pub fn active_proposals(&self, owner: Address) -> usize {
        self.active_per_owner.get(&owner).copied().unwrap_or(0)
    }

    /// Withdrawable fee share of `addr`.
    #[must_use]
    pub fn address_balance(&self, addr: Address) -> U256 {
        self.balances.get(&addr).copied().unwrap_or_default()
    }

    /// Undistributed remainder held in governance custody.
    #[must_use]
    pub fn treasury(&self) -> U256 {
        self.treasury
    }

    fn only_owner(&self, ctx: &TxContext) -> Result<(), GovernanceError> {
        if self.owners.contains(&ctx.caller) {
            Ok(())
        } else {
            Err(GovernanceError::NotOwner)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
