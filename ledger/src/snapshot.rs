//! Ledger snapshots: capture every contributor balance and the treasury at a height.
//!
//! Snapshots make the ledger auditable: the snapshot hash is computed
//! deterministically from the balances, so anyone holding a snapshot can check
//! that it was not altered, and rebuild a ledger from it.

use serde::{Deserialize, Serialize};

use dac_types::{GovernanceParams, Height};

use crate::account::ContributorAccount;
use crate::error::AuditError;
use crate::ledger::{Ledger, TreasuryTotals};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A ledger snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the contents.
    pub hash: [u8; 32],
    /// Height at which this snapshot was taken.
    pub height: Height,
    /// Treasury totals at `height`.
    pub totals: TreasuryTotals,
    /// Contributor accounts, ordered by address.
    pub contributors: Vec<ContributorAccount>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

impl LedgerSnapshot {
    /// Capture the current state of `ledger`.
    pub fn create(ledger: &Ledger, height: Height) -> Self {
        let mut snap = Self {
            hash: [0u8; 32],
            height,
            totals: ledger.totals(),
            contributors: ledger.accounts().cloned().collect(),
            version: SNAPSHOT_VERSION,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        for account in &self.contributors {
            hasher.update((account.address.as_bytes().len() as u64).to_le_bytes());
            hasher.update(account.address.as_bytes());
            hasher.update(account.cumulative_donated.raw().to_le_bytes());
            hasher.update(account.credit_balance.to_le_bytes());
            hasher.update(account.donation_count.to_le_bytes());
            hasher.update(account.first_donation_at.as_u64().to_le_bytes());
            hasher.update(account.last_donation_at.as_u64().to_le_bytes());
        }
        hasher.update(self.totals.balance.raw().to_le_bytes());
        hasher.update(self.totals.donated.raw().to_le_bytes());
        hasher.update(self.totals.disbursed.raw().to_le_bytes());
        hasher.update(self.height.as_u64().to_le_bytes());
        hasher.update(self.version.to_le_bytes());

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches the contents.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Rebuild a ledger from this snapshot after checking its hash and invariants.
    pub fn restore(&self, params: &GovernanceParams) -> Result<Ledger, AuditError> {
        if !self.verify() {
            return Err(AuditError::SnapshotHashMismatch);
        }
        Ledger::from_parts(params, self.contributors.iter().cloned(), self.totals)
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Number of contributors in this snapshot.
    pub fn contributor_count(&self) -> usize {
        self.contributors.len()
    }
}
