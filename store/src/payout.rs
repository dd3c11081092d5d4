//! Payout storage trait.

use crate::StoreError;
use dac_types::ProposalId;

/// Disbursements delivered to beneficiaries, one per executed proposal.
pub trait PayoutStore {
    fn put_payout(&self, proposal: ProposalId, data: &[u8]) -> Result<(), StoreError>;
    fn get_payout(&self, proposal: ProposalId) -> Result<Option<Vec<u8>>, StoreError>;
    /// All payouts in proposal-id order.
    fn iter_payouts(&self) -> Result<Vec<Vec<u8>>, StoreError>;
}
