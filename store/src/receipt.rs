//! Receipt storage trait.

use crate::StoreError;
use dac_types::TokenId;

pub trait ReceiptStore {
    fn put_receipt(&self, token_id: TokenId, data: &[u8]) -> Result<(), StoreError>;
    fn get_receipt(&self, token_id: TokenId) -> Result<Option<Vec<u8>>, StoreError>;
    /// All receipts in token-id order.
    fn iter_receipts(&self) -> Result<Vec<Vec<u8>>, StoreError>;
}
