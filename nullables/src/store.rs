//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use dac_store::keys::vote_key;
use dac_store::{
    BatchStore, ContributorStore, GovernanceStore, MetaStore, PayoutStore, ReceiptStore,
    StoreError, WriteBatch, WriteOp,
};
use dac_types::{Address, ProposalId, TokenId};

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

#[derive(Clone, Copy)]
enum Kind {
    Contributors,
    Proposals,
    Votes,
    Receipts,
    Payouts,
    Meta,
}

#[derive(Default)]
struct Tables {
    contributors: Table,
    proposals: Table,
    votes: Table,
    receipts: Table,
    payouts: Table,
    meta: Table,
}

impl Tables {
    fn table(&mut self, kind: Kind) -> &mut Table {
        match kind {
            Kind::Contributors => &mut self.contributors,
            Kind::Proposals => &mut self.proposals,
            Kind::Votes => &mut self.votes,
            Kind::Receipts => &mut self.receipts,
            Kind::Payouts => &mut self.payouts,
            Kind::Meta => &mut self.meta,
        }
    }

    fn apply(&mut self, op: WriteOp) {
        let (kind, key, data) = match op {
            WriteOp::Contributor { address, data } => {
                (Kind::Contributors, address.as_bytes().to_vec(), data)
            }
            WriteOp::Proposal { id, data } => (Kind::Proposals, id.to_key().to_vec(), data),
            WriteOp::Vote {
                proposal,
                voter,
                data,
            } => (Kind::Votes, vote_key(proposal, &voter), data),
            WriteOp::Receipt { token_id, data } => {
                (Kind::Receipts, token_id.to_key().to_vec(), data)
            }
            WriteOp::Payout { proposal, data } => (Kind::Payouts, proposal.to_key().to_vec(), data),
            WriteOp::Meta { key, data } => (Kind::Meta, key.into_bytes(), data),
        };
        self.table(kind).insert(key, data);
    }
}

/// An in-memory implementation of every store trait.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_next_commit: AtomicBool,
    commits: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next [`BatchStore::commit`] fail without writing anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".into()))
    }

    fn put(&self, kind: Kind, key: Vec<u8>, value: &[u8]) -> Result<(), StoreError> {
        self.tables()?.table(kind).insert(key, value.to_vec());
        Ok(())
    }

    fn get(&self, kind: Kind, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables()?.table(kind).get(key).cloned())
    }

    fn values(&self, kind: Kind) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.tables()?.table(kind).values().cloned().collect())
    }

    fn count(&self, kind: Kind) -> Result<u64, StoreError> {
        Ok(self.tables()?.table(kind).len() as u64)
    }
}

impl ContributorStore for NullStore {
    fn put_contributor(&self, address: &Address, data: &[u8]) -> Result<(), StoreError> {
        self.put(Kind::Contributors, address.as_bytes().to_vec(), data)
    }

    fn get_contributor(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Contributors, address.as_bytes())
    }

    fn iter_contributors(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(Kind::Contributors)
    }

    fn contributor_count(&self) -> Result<u64, StoreError> {
        self.count(Kind::Contributors)
    }
}

impl GovernanceStore for NullStore {
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.put(Kind::Proposals, id.to_key().to_vec(), data)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Proposals, &id.to_key())
    }

    fn iter_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(Kind::Proposals)
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        self.count(Kind::Proposals)
    }

    fn put_vote(
        &self,
        proposal: ProposalId,
        voter: &Address,
        data: &[u8],
    ) -> Result<(), StoreError> {
        self.put(Kind::Votes, vote_key(proposal, voter), data)
    }

    fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Address,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Votes, &vote_key(proposal, voter))
    }

    fn iter_votes(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(Kind::Votes)
    }
}

impl ReceiptStore for NullStore {
    fn put_receipt(&self, token_id: TokenId, data: &[u8]) -> Result<(), StoreError> {
        self.put(Kind::Receipts, token_id.to_key().to_vec(), data)
    }

    fn get_receipt(&self, token_id: TokenId) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Receipts, &token_id.to_key())
    }

    fn iter_receipts(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(Kind::Receipts)
    }
}

impl PayoutStore for NullStore {
    fn put_payout(&self, proposal: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        self.put(Kind::Payouts, proposal.to_key().to_vec(), data)
    }

    fn get_payout(&self, proposal: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Payouts, &proposal.to_key())
    }

    fn iter_payouts(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        self.values(Kind::Payouts)
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.put(Kind::Meta, key.as_bytes().to_vec(), value)
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.get(Kind::Meta, key.as_bytes())
    }
}

impl BatchStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".into()));
        }
        let mut tables = self.tables()?;
        for op in batch.into_ops() {
            tables.apply(op);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
