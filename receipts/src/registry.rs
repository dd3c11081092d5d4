//! Receipt registry: an append-only table of minted receipts.

use std::collections::BTreeMap;

use dac_ledger::Ledger;
use dac_types::{Address, GovernanceParams, Height, TokenId};
use serde::{Deserialize, Serialize};

use crate::error::ReceiptError;

/// A minted donation receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub token_id: TokenId,
    pub owner: Address,
    /// Opaque pointer to off-ledger metadata (e.g. `ipfs://...`).
    pub metadata_uri: String,
    pub minted_at: Height,
}

/// All receipts, indexed by token id and by owner.
#[derive(Clone, Debug)]
pub struct ReceiptRegistry {
    max_uri_len: usize,
    /// Position `i` holds token id `i + 1`.
    receipts: Vec<Receipt>,
    by_owner: BTreeMap<Address, Vec<TokenId>>,
}

impl ReceiptRegistry {
    pub fn new(params: &GovernanceParams) -> Self {
        Self {
            max_uri_len: params.max_uri_len,
            receipts: Vec::new(),
            by_owner: BTreeMap::new(),
        }
    }

    /// Rebuild the registry from persisted receipts.
    ///
    /// Receipts must arrive in token-id order with no gaps.
    pub fn from_receipts(
        params: &GovernanceParams,
        receipts: impl IntoIterator<Item = Receipt>,
    ) -> Result<Self, ReceiptError> {
        let mut registry = Self::new(params);
        for receipt in receipts {
            let expected = TokenId::from_index(registry.receipts.len());
            if receipt.token_id != expected {
                return Err(ReceiptError::NotFound(expected));
            }
            registry.insert(receipt);
        }
        Ok(registry)
    }

    /// Mint a receipt for `donor`.
    ///
    /// Fails with [`ReceiptError::NotADonor`] if the ledger holds no donation
    /// from `donor`. There is no per-donor cap.
    pub fn mint(
        &mut self,
        ledger: &Ledger,
        donor: &Address,
        metadata_uri: &str,
        height: Height,
    ) -> Result<TokenId, ReceiptError> {
        if ledger.cumulative_donated(donor).is_zero() {
            tracing::debug!(%donor, "receipt refused: no donation history");
            return Err(ReceiptError::NotADonor(donor.clone()));
        }
        self.validate_uri(metadata_uri)?;

        let token_id = self.next_token_id()?;
        self.insert(Receipt {
            token_id,
            owner: donor.clone(),
            metadata_uri: metadata_uri.to_string(),
            minted_at: height,
        });

        tracing::info!(%donor, %token_id, uri = metadata_uri, "receipt minted");
        Ok(token_id)
    }

    fn validate_uri(&self, uri: &str) -> Result<(), ReceiptError> {
        if uri.is_empty() {
            return Err(ReceiptError::InvalidUri("empty".into()));
        }
        if uri.len() > self.max_uri_len {
            return Err(ReceiptError::InvalidUri(format!(
                "{} bytes exceeds limit of {}",
                uri.len(),
                self.max_uri_len
            )));
        }
        if uri.chars().any(char::is_control) {
            return Err(ReceiptError::InvalidUri("contains control characters".into()));
        }
        Ok(())
    }

    fn next_token_id(&self) -> Result<TokenId, ReceiptError> {
        u64::try_from(self.receipts.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .map(TokenId::new)
            .ok_or(ReceiptError::Overflow)
    }

    fn insert(&mut self, receipt: Receipt) {
        self.by_owner
            .entry(receipt.owner.clone())
            .or_default()
            .push(receipt.token_id);
        self.receipts.push(receipt);
    }

    pub fn get(&self, token_id: TokenId) -> Option<&Receipt> {
        token_id.index().and_then(|i| self.receipts.get(i))
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<&Address, ReceiptError> {
        self.get(token_id)
            .map(|receipt| &receipt.owner)
            .ok_or(ReceiptError::NotFound(token_id))
    }

    /// Token ids owned by `owner`, in mint order.
    pub fn tokens_of(&self, owner: &Address) -> &[TokenId] {
        self.by_owner.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The most recently minted token id, if any.
    pub fn last_token_id(&self) -> Option<TokenId> {
        self.receipts.last().map(|receipt| receipt.token_id)
    }

    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Receipt> {
        self.receipts.iter()
    }
}
