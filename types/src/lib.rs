//! Fundamental types for the charity DAO ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, amounts, heights, record identifiers, governance parameters and the
//! error-kind discriminant every operation reports through.

pub mod address;
pub mod amount;
pub mod error;
pub mod height;
pub mod ids;
pub mod params;

pub use address::Address;
pub use amount::Amount;
pub use error::{ErrorKind, TypesError};
pub use height::Height;
pub use ids::{ProposalId, TokenId};
pub use params::GovernanceParams;
