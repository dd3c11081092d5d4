//! Abstract storage traits for the charity governance ledger.
//!
//! Every backend (LMDB, in-memory for testing) implements these traits. The
//! host depends only on the traits and encodes records itself, so a backend
//! never needs to know what a proposal or a vote looks like.

pub mod batch;
pub mod contributor;
pub mod error;
pub mod governance;
pub mod keys;
pub mod meta;
pub mod payout;
pub mod receipt;

pub use batch::{BatchStore, WriteBatch, WriteOp};
pub use contributor::ContributorStore;
pub use error::StoreError;
pub use governance::GovernanceStore;
pub use meta::MetaStore;
pub use payout::PayoutStore;
pub use receipt::ReceiptStore;

/// Everything the node needs from a backend.
pub trait DaoStore:
    ContributorStore + GovernanceStore + ReceiptStore + PayoutStore + MetaStore + BatchStore
{
}

impl<T> DaoStore for T where
    T: ContributorStore + GovernanceStore + ReceiptStore + PayoutStore + MetaStore + BatchStore
{
}
