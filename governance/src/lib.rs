//! Credit-weighted governance for the charity treasury.
//!
//! Lifecycle: Open → Closed → Executed.
//! A proposal accepts votes while the current height is below its deadline.
//! Once the deadline is reached anyone may execute it; execution succeeds
//! exactly once, and only when yes-weight strictly exceeds no-weight and the
//! treasury can cover the requested amount.
//!
//! Key principle: one credit = one vote, weighted by the voter's credit balance
//! at the moment the vote is cast.

pub mod engine;
pub mod error;
pub mod proposal;
pub mod state;
pub mod store;

pub use engine::GovernanceEngine;
pub use error::{GovernanceError, StateError};
pub use proposal::{Disbursement, NewProposal, Proposal, ProposalStatus, VoteRecord};
pub use state::{DaoState, FundStats};
pub use store::ProposalStore;
