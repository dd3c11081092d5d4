//! LMDB implementation of ContributorStore.

use dac_store::{ContributorStore, StoreError};
use dac_types::Address;

use crate::LmdbEnvironment;

impl ContributorStore for LmdbEnvironment {
    fn put_contributor(&self, address: &Address, data: &[u8]) -> Result<(), StoreError> {
        Ok(self.put(self.contributors_db, address.as_bytes(), data)?)
    }

    fn get_contributor(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.contributors_db, address.as_bytes())?)
    }

    fn iter_contributors(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.values(self.contributors_db)?)
    }

    fn contributor_count(&self) -> Result<u64, StoreError> {
        Ok(self.count(self.contributors_db)?)
    }
}
