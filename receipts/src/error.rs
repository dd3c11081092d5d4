use dac_types::{Address, ErrorKind, TokenId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    #[error("{0} has no donation history")]
    NotADonor(Address),

    #[error("invalid metadata URI: {0}")]
    InvalidUri(String),

    #[error("receipt {0} not found")]
    NotFound(TokenId),

    #[error("token id space exhausted")]
    Overflow,
}

impl ReceiptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotADonor(_) => ErrorKind::NotADonor,
            Self::InvalidUri(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Overflow => ErrorKind::Overflow,
        }
    }
}
