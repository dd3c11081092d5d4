//! Contributor account storage trait.

use crate::StoreError;
use dac_types::Address;

/// Serialized contributor accounts, keyed by address.
pub trait ContributorStore {
    fn put_contributor(&self, address: &Address, data: &[u8]) -> Result<(), StoreError>;
    fn get_contributor(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError>;
    /// All contributor records, ordered by address bytes.
    fn iter_contributors(&self) -> Result<Vec<Vec<u8>>, StoreError>;
    fn contributor_count(&self) -> Result<u64, StoreError>;
}
