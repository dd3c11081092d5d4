use dac_types::{Address, Amount, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("donation of {amount} is below the minimum of {minimum}")]
    InvalidAmount { amount: Amount, minimum: Amount },

    #[error("insufficient treasury funds: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("arithmetic overflow in ledger accounting")]
    Overflow,
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::Overflow => ErrorKind::Overflow,
        }
    }
}

/// Raised when persisted ledger state breaks an accounting invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("contributor {address} holds {recorded} credits, expected {expected}")]
    CreditMismatch {
        address: Address,
        recorded: u64,
        expected: u128,
    },

    #[error("contributor {0} appears more than once")]
    DuplicateContributor(Address),

    #[error("treasury {treasury} does not equal donated {donated} minus disbursed {disbursed}")]
    TreasuryMismatch {
        treasury: Amount,
        donated: Amount,
        disbursed: Amount,
    },

    #[error("contributor donations sum to {sum}, but {recorded} is recorded as donated")]
    DonationTotalMismatch { sum: Amount, recorded: Amount },

    #[error("snapshot hash does not match its contents")]
    SnapshotHashMismatch,
}
