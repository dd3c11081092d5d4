//! Contributor ledger.
//!
//! Tracks what every contributor has donated, the governance credits that
//! follow from it, and the treasury those donations fund. Credits are never
//! stored independently of donations: a contributor's balance is always
//! `floor(cumulative_donated / donation_unit)`.

pub mod account;
pub mod error;
pub mod ledger;
pub mod snapshot;

pub use account::ContributorAccount;
pub use error::{AuditError, LedgerError};
pub use ledger::{Ledger, TreasuryTotals};
pub use snapshot::LedgerSnapshot;
