//! Calls a sender can submit to the node, and their results.

use dac_governance::{Disbursement, NewProposal};
use dac_types::{Amount, ProposalId, TokenId};
use serde::{Deserialize, Serialize};

/// A state-changing request. The sender is supplied alongside, never inside.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    Donate { amount: Amount },
    CreateProposal(NewProposal),
    Vote { proposal_id: ProposalId, support: bool },
    ExecuteProposal { proposal_id: ProposalId },
    MintReceipt { metadata_uri: String },
}

impl Call {
    pub fn name(&self) -> &'static str {
        match self {
            Call::Donate { .. } => "donate",
            Call::CreateProposal(_) => "create-proposal",
            Call::Vote { .. } => "vote",
            Call::ExecuteProposal { .. } => "execute-proposal",
            Call::MintReceipt { .. } => "mint-donation-nft",
        }
    }
}

/// The success value of a [`Call`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutcome {
    /// New credit balance of the donor.
    Donated { credits: u64 },
    ProposalCreated { proposal_id: ProposalId },
    /// Weight recorded for the ballot.
    Voted { weight: u64 },
    Executed(Disbursement),
    Minted { token_id: TokenId },
}
