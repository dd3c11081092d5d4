//! Governance storage trait.

use crate::StoreError;
use dac_types::{Address, ProposalId};

/// Storing proposals and the votes cast on them.
pub trait GovernanceStore {
    /// Store a proposal, replacing any earlier version with the same id.
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError>;

    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError>;

    /// All proposals in id order.
    fn iter_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError>;

    fn proposal_count(&self) -> Result<u64, StoreError>;

    /// Store a vote on a proposal.
    fn put_vote(&self, proposal: ProposalId, voter: &Address, data: &[u8])
        -> Result<(), StoreError>;

    /// Get a specific voter's vote on a proposal.
    fn get_vote(&self, proposal: ProposalId, voter: &Address)
        -> Result<Option<Vec<u8>>, StoreError>;

    /// Every vote on every proposal, grouped by proposal id.
    fn iter_votes(&self) -> Result<Vec<Vec<u8>>, StoreError>;
}
