//! Error kinds shared across crates.
//!
//! Each crate has its own error enum; all of them map onto one [`ErrorKind`] so
//! callers can branch on a stable discriminant and report contract-style codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The discriminant of every expected failure of a public operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotAuthorized,
    InvalidAmount,
    NotFound,
    VotingClosed,
    AlreadyVoted,
    NotYetExpired,
    AlreadyExecuted,
    ProposalRejected,
    InsufficientFunds,
    NotADonor,
    InvalidInput,
    Overflow,
}

impl ErrorKind {
    /// Stable numeric error code.
    pub fn code(&self) -> u32 {
        match self {
            Self::NotAuthorized => 100,
            Self::InvalidAmount => 101,
            Self::NotFound => 102,
            Self::VotingClosed => 103,
            Self::AlreadyVoted => 104,
            Self::NotYetExpired => 105,
            Self::AlreadyExecuted => 106,
            Self::ProposalRejected => 107,
            Self::InsufficientFunds => 108,
            Self::NotADonor => 109,
            Self::InvalidInput => 110,
            Self::Overflow => 111,
        }
    }

    /// Contract-style constant name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAuthorized => "ERR-NOT-AUTHORIZED",
            Self::InvalidAmount => "ERR-INVALID-AMOUNT",
            Self::NotFound => "ERR-NOT-FOUND",
            Self::VotingClosed => "ERR-VOTING-CLOSED",
            Self::AlreadyVoted => "ERR-ALREADY-VOTED",
            Self::NotYetExpired => "ERR-NOT-YET-EXPIRED",
            Self::AlreadyExecuted => "ERR-ALREADY-EXECUTED",
            Self::ProposalRejected => "ERR-PROPOSAL-REJECTED",
            Self::InsufficientFunds => "ERR-INSUFFICIENT-FUNDS",
            Self::NotADonor => "ERR-NOT-A-DONOR",
            Self::InvalidInput => "ERR-INVALID-INPUT",
            Self::Overflow => "ERR-OVERFLOW",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (u{})", self.name(), self.code())
    }
}

/// Errors raised while constructing the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid governance parameters: {0}")]
    InvalidParams(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let kinds = [
            ErrorKind::NotAuthorized,
            ErrorKind::InvalidAmount,
            ErrorKind::NotFound,
            ErrorKind::VotingClosed,
            ErrorKind::AlreadyVoted,
            ErrorKind::NotYetExpired,
            ErrorKind::AlreadyExecuted,
            ErrorKind::ProposalRejected,
            ErrorKind::InsufficientFunds,
            ErrorKind::NotADonor,
            ErrorKind::InvalidInput,
            ErrorKind::Overflow,
        ];
        let mut codes: Vec<u32> = kinds.iter().map(ErrorKind::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn display_contains_name_and_code() {
        assert_eq!(
            ErrorKind::InvalidAmount.to_string(),
            "ERR-INVALID-AMOUNT (u101)"
        );
    }
}
