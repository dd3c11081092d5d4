//! LMDB implementation of ReceiptStore.

use dac_store::{ReceiptStore, StoreError};
use dac_types::TokenId;

use crate::LmdbEnvironment;

impl ReceiptStore for LmdbEnvironment {
    fn put_receipt(&self, token_id: TokenId, data: &[u8]) -> Result<(), StoreError> {
        Ok(self.put(self.receipts_db, &token_id.to_key(), data)?)
    }

    fn get_receipt(&self, token_id: TokenId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.receipts_db, &token_id.to_key())?)
    }

    fn iter_receipts(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.values(self.receipts_db)?)
    }
}
