//! Key layout shared by every backend.
//!
//! Numeric ids are big-endian so lexicographic key order equals id order.

use dac_types::{Address, ProposalId};

/// `proposal_id (8 bytes BE) ++ voter address bytes`.
pub fn vote_key(proposal: ProposalId, voter: &Address) -> Vec<u8> {
    let mut key = Vec::with_capacity(8 + voter.as_bytes().len());
    key.extend_from_slice(&proposal.to_key());
    key.extend_from_slice(voter.as_bytes());
    key
}
