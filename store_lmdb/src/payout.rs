//! LMDB implementation of PayoutStore.

use dac_store::{PayoutStore, StoreError};
use dac_types::ProposalId;

use crate::LmdbEnvironment;

impl PayoutStore for LmdbEnvironment {
    fn put_payout(&self, proposal: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        Ok(self.put(self.payouts_db, &proposal.to_key(), data)?)
    }

    fn get_payout(&self, proposal: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.payouts_db, &proposal.to_key())?)
    }

    fn iter_payouts(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.values(self.payouts_db)?)
    }
}
