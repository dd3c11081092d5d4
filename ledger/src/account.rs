//! Per-contributor account records.

use dac_types::{Address, Amount, Height};
use serde::{Deserialize, Serialize};

/// A contributor's donation history and derived credit balance.
///
/// Created on the first accepted donation and never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorAccount {
    pub address: Address,
    /// Sum of every accepted donation.
    pub cumulative_donated: Amount,
    /// Governance credits: `floor(cumulative_donated / donation_unit)`.
    pub credit_balance: u64,
    /// Number of accepted donations.
    pub donation_count: u64,
    pub first_donation_at: Height,
    pub last_donation_at: Height,
}

impl ContributorAccount {
    /// Whether the stored credit balance matches the floor-division rule.
    pub fn credits_consistent(&self, donation_unit: Amount) -> bool {
        u128::from(self.credit_balance) == self.cumulative_donated.units_of(donation_unit)
    }
}
