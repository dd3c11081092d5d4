//! Proposals, votes and disbursements.

use dac_types::{Address, Amount, Height, ProposalId};
use serde::{Deserialize, Serialize};

/// Where a proposal is in its lifecycle at a given height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalStatus {
    /// Below the deadline: votes are accepted.
    Open,
    /// Deadline reached, not executed. Executable if it passed; a rejected
    /// proposal stays here forever.
    Closed,
    /// Funds sent. Terminal.
    Executed,
}

/// The caller-supplied part of a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProposal {
    pub title: String,
    pub description: String,
    pub beneficiary: Address,
    pub requested_amount: Amount,
    /// Voting window length in blocks, counted from the creation height.
    pub duration_blocks: u64,
}

/// A request to disburse treasury funds to a beneficiary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub beneficiary: Address,
    pub requested_amount: Amount,
    pub proposer: Address,
    pub created_at: Height,
    /// First height at which voting is closed and execution allowed.
    pub deadline: Height,
    pub yes_weight: u64,
    pub no_weight: u64,
    pub executed: bool,
    pub executed_at: Option<Height>,
}

impl Proposal {
    pub fn status(&self, height: Height) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else if height.has_reached(self.deadline) {
            ProposalStatus::Closed
        } else {
            ProposalStatus::Open
        }
    }

    pub fn is_open(&self, height: Height) -> bool {
        self.status(height) == ProposalStatus::Open
    }

    /// Simple majority of cast weight. No quorum is applied.
    pub fn passes(&self) -> bool {
        self.yes_weight > self.no_weight
    }

    pub fn total_weight(&self) -> u128 {
        u128::from(self.yes_weight) + u128::from(self.no_weight)
    }
}

/// One voter's ballot on one proposal, with the weight frozen at cast time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub proposal_id: ProposalId,
    pub voter: Address,
    pub support: bool,
    pub weight: u64,
    pub cast_at: Height,
}

/// The transfer produced by a successful execution.
///
/// The treasury has already been debited; the host delivers `amount` to
/// `beneficiary`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disbursement {
    pub proposal_id: ProposalId,
    pub beneficiary: Address,
    pub amount: Amount,
    pub executed_by: Address,
    pub height: Height,
}
