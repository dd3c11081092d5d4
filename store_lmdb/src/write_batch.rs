//! Write batching: applies a [`WriteBatch`] inside a single LMDB write
//! transaction.
//!
//! If any put fails the transaction is dropped without commit and LMDB
//! aborts it, so no operation from the batch is persisted.

use dac_store::keys::vote_key;
use dac_store::{BatchStore, StoreError, WriteBatch, WriteOp};

use crate::{LmdbEnvironment, LmdbError};

impl BatchStore for LmdbEnvironment {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let ops = batch.len();
        let mut txn = self.env.write_txn().map_err(LmdbError::from)?;

        for op in batch.into_ops() {
            let result = match op {
                WriteOp::Contributor { address, data } => {
                    self.contributors_db.put(&mut txn, address.as_bytes(), &data)
                }
                WriteOp::Proposal { id, data } => self.proposals_db.put(&mut txn, &id.to_key(), &data),
                WriteOp::Vote {
                    proposal,
                    voter,
                    data,
                } => self.votes_db.put(&mut txn, &vote_key(proposal, &voter), &data),
                WriteOp::Receipt { token_id, data } => {
                    self.receipts_db.put(&mut txn, &token_id.to_key(), &data)
                }
                WriteOp::Payout { proposal, data } => {
                    self.payouts_db.put(&mut txn, &proposal.to_key(), &data)
                }
                WriteOp::Meta { key, data } => self.meta_db.put(&mut txn, key.as_bytes(), &data),
            };
            result.map_err(LmdbError::from)?;
        }

        txn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops, "write batch committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dac_store::meta::HEIGHT_KEY;
    use dac_store::{ContributorStore, GovernanceStore, MetaStore, PayoutStore};
    use dac_types::{Address, ProposalId};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    #[test]
    fn batch_writes_every_table() {
        let (_dir, env) = temp_env();
        let donor = Address::new("donor1");
        let id = ProposalId::FIRST;

        let mut batch = WriteBatch::new();
        batch.put_contributor(&donor, b"account".to_vec());
        batch.put_proposal(id, b"proposal".to_vec());
        batch.put_vote(id, &donor, b"vote".to_vec());
        batch.put_payout(id, b"payout".to_vec());
        batch.put_meta(HEIGHT_KEY, 3u64.to_be_bytes().to_vec());
        env.commit(batch).expect("commit");

        assert_eq!(env.get_contributor(&donor).expect("get"), Some(b"account".to_vec()));
        assert_eq!(env.get_proposal(id).expect("get"), Some(b"proposal".to_vec()));
        assert_eq!(env.get_vote(id, &donor).expect("get"), Some(b"vote".to_vec()));
        assert_eq!(env.get_payout(id).expect("get"), Some(b"payout".to_vec()));
        assert_eq!(
            env.get_meta(HEIGHT_KEY).expect("get"),
            Some(3u64.to_be_bytes().to_vec())
        );
    }

    #[test]
    fn later_put_in_batch_wins() {
        let (_dir, env) = temp_env();
        let id = ProposalId::FIRST;
        let mut batch = WriteBatch::new();
        batch.put_proposal(id, b"open".to_vec());
        batch.put_proposal(id, b"executed".to_vec());
        env.commit(batch).expect("commit");
        assert_eq!(env.get_proposal(id).expect("get"), Some(b"executed".to_vec()));
        assert_eq!(env.proposal_count().expect("count"), 1);
    }

    #[test]
    fn empty_batch_is_noop() {
        let (_dir, env) = temp_env();
        env.commit(WriteBatch::new()).expect("commit");
        assert_eq!(env.contributor_count().expect("count"), 0);
    }
}
