use dac_ledger::{AuditError, LedgerError};
use dac_receipts::ReceiptError;
use dac_types::{Address, ErrorKind, Height, ProposalId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("{0} holds no governance credits")]
    NotAuthorized(Address),

    #[error("requested amount must be greater than zero")]
    ZeroRequestedAmount,

    #[error("{0} not found")]
    NotFound(ProposalId),

    #[error("voting on {id} closed at {deadline} (now {height})")]
    VotingClosed {
        id: ProposalId,
        deadline: Height,
        height: Height,
    },

    #[error("{voter} has already voted on {id}")]
    AlreadyVoted { id: ProposalId, voter: Address },

    #[error("{id} cannot be executed before {deadline} (now {height})")]
    NotYetExpired {
        id: ProposalId,
        deadline: Height,
        height: Height,
    },

    #[error("{0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("{id} was rejected: {yes} yes against {no} no")]
    ProposalRejected { id: ProposalId, yes: u64, no: u64 },

    #[error("invalid proposal: {0}")]
    InvalidInput(String),

    #[error("arithmetic overflow in governance accounting")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAuthorized(_) => ErrorKind::NotAuthorized,
            Self::ZeroRequestedAmount => ErrorKind::InvalidAmount,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::VotingClosed { .. } => ErrorKind::VotingClosed,
            Self::AlreadyVoted { .. } => ErrorKind::AlreadyVoted,
            Self::NotYetExpired { .. } => ErrorKind::NotYetExpired,
            Self::AlreadyExecuted(_) => ErrorKind::AlreadyExecuted,
            Self::ProposalRejected { .. } => ErrorKind::ProposalRejected,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Overflow => ErrorKind::Overflow,
            Self::Ledger(e) => e.kind(),
        }
    }
}

/// Raised when persisted records cannot be assembled into a consistent state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("expected {expected}, found {found}")]
    ProposalGap {
        expected: ProposalId,
        found: ProposalId,
    },

    #[error("vote by {voter} references missing {id}")]
    OrphanVote { id: ProposalId, voter: Address },

    #[error("{id} records {recorded_yes}/{recorded_no} but its votes sum to {yes}/{no}")]
    TallyMismatch {
        id: ProposalId,
        recorded_yes: u64,
        recorded_no: u64,
        yes: u64,
        no: u64,
    },

    #[error("ledger audit failed: {0}")]
    Ledger(#[from] AuditError),

    #[error("receipt table invalid: {0}")]
    Receipts(#[from] ReceiptError),
}
