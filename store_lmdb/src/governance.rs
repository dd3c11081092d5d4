//! LMDB implementation of GovernanceStore.
//!
//! Proposals are keyed by big-endian id. Votes use the composite key from
//! [`dac_store::keys::vote_key`], so a full scan returns them grouped by
//! proposal.

use dac_store::keys::vote_key;
use dac_store::{GovernanceStore, StoreError};
use dac_types::{Address, ProposalId};

use crate::LmdbEnvironment;

impl GovernanceStore for LmdbEnvironment {
    fn put_proposal(&self, id: ProposalId, data: &[u8]) -> Result<(), StoreError> {
        Ok(self.put(self.proposals_db, &id.to_key(), data)?)
    }

    fn get_proposal(&self, id: ProposalId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.proposals_db, &id.to_key())?)
    }

    fn iter_proposals(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.values(self.proposals_db)?)
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.count(self.proposals_db)?)
    }

    fn put_vote(
        &self,
        proposal: ProposalId,
        voter: &Address,
        data: &[u8],
    ) -> Result<(), StoreError> {
        Ok(self.put(self.votes_db, &vote_key(proposal, voter), data)?)
    }

    fn get_vote(
        &self,
        proposal: ProposalId,
        voter: &Address,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get(self.votes_db, &vote_key(proposal, voter))?)
    }

    fn iter_votes(&self) -> Result<Vec<Vec<u8>>, StoreError> {
        Ok(self.values(self.votes_db)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    #[test]
    fn proposals_iterate_in_id_order() {
        let (_dir, env) = temp_env();
        for id in [3u64, 1, 256, 2] {
            env.put_proposal(ProposalId::new(id), &id.to_be_bytes())
                .expect("put_proposal");
        }
        let ids: Vec<u64> = env
            .iter_proposals()
            .expect("iter")
            .into_iter()
            .map(|v| u64::from_be_bytes(v.try_into().expect("8 bytes")))
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 256]);
        assert_eq!(env.proposal_count().expect("count"), 4);
    }

    #[test]
    fn votes_are_keyed_by_proposal_and_voter() {
        let (_dir, env) = temp_env();
        let alice = Address::new("alice");
        let bob = Address::new("bob");
        env.put_vote(ProposalId::new(1), &alice, b"yes").expect("put_vote");
        env.put_vote(ProposalId::new(2), &alice, b"no").expect("put_vote");

        assert_eq!(
            env.get_vote(ProposalId::new(1), &alice).expect("get").as_deref(),
            Some(&b"yes"[..])
        );
        assert!(env.get_vote(ProposalId::new(1), &bob).expect("get").is_none());
        assert_eq!(env.iter_votes().expect("iter"), vec![b"yes".to_vec(), b"no".to_vec()]);
    }

    #[test]
    fn missing_proposal_is_none() {
        let (_dir, env) = temp_env();
        assert!(env.get_proposal(ProposalId::new(42)).expect("get").is_none());
    }
}
