use dac_governance::{GovernanceError, StateError};
use dac_receipts::ReceiptError;
use dac_store::StoreError;
use dac_store_lmdb::LmdbError;
use dac_types::{ErrorKind, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("receipt error: {0}")]
    Receipt(#[from] ReceiptError),

    #[error("persisted state is inconsistent: {0}")]
    State(#[from] StateError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] LmdbError),

    #[error("encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("invalid parameters: {0}")]
    Params(#[from] TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeError {
    /// The domain error kind, for failures caused by the call itself rather
    /// than by the infrastructure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            NodeError::Governance(e) => Some(e.kind()),
            NodeError::Receipt(e) => Some(e.kind()),
            _ => None,
        }
    }
}
