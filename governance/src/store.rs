//! Proposal table and per-proposal vote records.
//!
//! Proposals are append-only: position `i` holds id `i + 1`, and ids are
//! never reused. A voter's record for a proposal is written once and never
//! overwritten, which is what makes double-voting impossible.

use std::collections::BTreeMap;

use dac_types::{Address, Height, ProposalId};

use crate::error::{GovernanceError, StateError};
use crate::proposal::{NewProposal, Proposal, VoteRecord};

#[derive(Clone, Debug, Default)]
pub struct ProposalStore {
    proposals: Vec<Proposal>,
    votes: BTreeMap<ProposalId, BTreeMap<Address, VoteRecord>>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the table from persisted proposals and votes.
    ///
    /// Proposals must arrive in id order with no gaps, every vote must refer
    /// to a known proposal, and each proposal's tallies must equal the sum of
    /// its recorded votes.
    pub fn from_records(
        proposals: impl IntoIterator<Item = Proposal>,
        votes: impl IntoIterator<Item = VoteRecord>,
    ) -> Result<Self, StateError> {
        let mut store = Self::new();
        for proposal in proposals {
            let expected = ProposalId::from_index(store.proposals.len());
            if proposal.id != expected {
                return Err(StateError::ProposalGap {
                    expected,
                    found: proposal.id,
                });
            }
            store.proposals.push(proposal);
        }

        for vote in votes {
            if store.get(vote.proposal_id).is_none() {
                return Err(StateError::OrphanVote {
                    id: vote.proposal_id,
                    voter: vote.voter,
                });
            }
            store
                .votes
                .entry(vote.proposal_id)
                .or_default()
                .insert(vote.voter.clone(), vote);
        }

        for proposal in &store.proposals {
            let (yes, no) = store.votes_for(proposal.id).fold((0u64, 0u64), |(y, n), v| {
                if v.support {
                    (y.saturating_add(v.weight), n)
                } else {
                    (y, n.saturating_add(v.weight))
                }
            });
            if yes != proposal.yes_weight || no != proposal.no_weight {
                return Err(StateError::TallyMismatch {
                    id: proposal.id,
                    recorded_yes: proposal.yes_weight,
                    recorded_no: proposal.no_weight,
                    yes,
                    no,
                });
            }
        }

        Ok(store)
    }

    /// Append a proposal whose voting window closes `duration_blocks` after
    /// `height`. Inputs are assumed validated by the caller.
    pub fn create(
        &mut self,
        proposer: &Address,
        draft: NewProposal,
        height: Height,
    ) -> Result<ProposalId, GovernanceError> {
        let id = u64::try_from(self.proposals.len())
            .ok()
            .and_then(|n| n.checked_add(1))
            .map(ProposalId::new)
            .ok_or(GovernanceError::Overflow)?;

        self.proposals.push(Proposal {
            id,
            title: draft.title,
            description: draft.description,
            beneficiary: draft.beneficiary,
            requested_amount: draft.requested_amount,
            proposer: proposer.clone(),
            created_at: height,
            deadline: height.advanced_by(draft.duration_blocks),
            yes_weight: 0,
            no_weight: 0,
            executed: false,
            executed_at: None,
        });
        Ok(id)
    }

    /// Record `voter`'s ballot with the given weight and add it to the tally.
    ///
    /// The proposal must exist, still be open at `height`, and have no prior
    /// ballot from `voter`.
    pub fn record_vote(
        &mut self,
        id: ProposalId,
        voter: &Address,
        support: bool,
        weight: u64,
        height: Height,
    ) -> Result<(), GovernanceError> {
        self.ensure_votable(id, voter, height)?;

        let index = id.index().ok_or(GovernanceError::NotFound(id))?;
        let proposal = self
            .proposals
            .get_mut(index)
            .ok_or(GovernanceError::NotFound(id))?;
        let tally = if support {
            &mut proposal.yes_weight
        } else {
            &mut proposal.no_weight
        };
        *tally = tally.checked_add(weight).ok_or(GovernanceError::Overflow)?;

        self.votes.entry(id).or_default().insert(
            voter.clone(),
            VoteRecord {
                proposal_id: id,
                voter: voter.clone(),
                support,
                weight,
                cast_at: height,
            },
        );
        Ok(())
    }

    /// Check, without mutating, that `voter` may vote on `id` at `height`.
    pub fn ensure_votable(
        &self,
        id: ProposalId,
        voter: &Address,
        height: Height,
    ) -> Result<&Proposal, GovernanceError> {
        let proposal = self.get(id).ok_or(GovernanceError::NotFound(id))?;
        if height.has_reached(proposal.deadline) {
            return Err(GovernanceError::VotingClosed {
                id,
                deadline: proposal.deadline,
                height,
            });
        }
        if self.has_voted(id, voter) {
            return Err(GovernanceError::AlreadyVoted {
                id,
                voter: voter.clone(),
            });
        }
        Ok(proposal)
    }

    /// Check, without mutating, that `id` may be executed at `height`.
    ///
    /// Does not look at the treasury; that is the engine's job.
    pub fn ensure_executable(
        &self,
        id: ProposalId,
        height: Height,
    ) -> Result<&Proposal, GovernanceError> {
        let proposal = self.get(id).ok_or(GovernanceError::NotFound(id))?;
        if !height.has_reached(proposal.deadline) {
            return Err(GovernanceError::NotYetExpired {
                id,
                deadline: proposal.deadline,
                height,
            });
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        if !proposal.passes() {
            return Err(GovernanceError::ProposalRejected {
                id,
                yes: proposal.yes_weight,
                no: proposal.no_weight,
            });
        }
        Ok(proposal)
    }

    pub fn mark_executed(&mut self, id: ProposalId, height: Height) -> Result<(), GovernanceError> {
        let proposal = id
            .index()
            .and_then(|i| self.proposals.get_mut(i))
            .ok_or(GovernanceError::NotFound(id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        proposal.executed = true;
        proposal.executed_at = Some(height);
        Ok(())
    }

    pub fn get(&self, id: ProposalId) -> Option<&Proposal> {
        id.index().and_then(|i| self.proposals.get(i))
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.vote_of(id, voter).is_some()
    }

    pub fn vote_of(&self, id: ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.votes.get(&id).and_then(|ballots| ballots.get(voter))
    }

    /// Every ballot cast on `id`, ordered by voter address.
    pub fn votes_for(&self, id: ProposalId) -> impl Iterator<Item = &VoteRecord> {
        self.votes.get(&id).into_iter().flat_map(|ballots| ballots.values())
    }

    /// Up to `count` proposals starting at id `from` (ids below 1 start at 1).
    pub fn page(&self, from: u64, count: usize) -> &[Proposal] {
        let start = usize::try_from(from.max(1) - 1).unwrap_or(usize::MAX);
        if start >= self.proposals.len() {
            return &[];
        }
        let end = start.saturating_add(count).min(self.proposals.len());
        &self.proposals[start..end]
    }

    /// Proposals still accepting votes at `height`.
    pub fn active(&self, height: Height) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter().filter(move |p| p.is_open(height))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn last_id(&self) -> Option<ProposalId> {
        self.proposals.last().map(|p| p.id)
    }

    pub fn executed_count(&self) -> usize {
        self.proposals.iter().filter(|p| p.executed).count()
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dac_types::Amount;

    fn draft(duration_blocks: u64) -> NewProposal {
        NewProposal {
            title: "Help Local Food Bank".into(),
            description: "Provide meals to local community".into(),
            beneficiary: Address::new("beneficiary"),
            requested_amount: Amount::new(1_000_000),
            duration_blocks,
        }
    }

    fn store_with_one(duration_blocks: u64) -> (ProposalStore, ProposalId) {
        let mut store = ProposalStore::new();
        let id = store
            .create(&Address::new("donor1"), draft(duration_blocks), Height::new(10))
            .unwrap();
        (store, id)
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = ProposalStore::new();
        let proposer = Address::new("donor1");
        let a = store.create(&proposer, draft(10), Height::new(1)).unwrap();
        let b = store.create(&proposer, draft(10), Height::new(1)).unwrap();
        assert_eq!(a, ProposalId::FIRST);
        assert_eq!(b, ProposalId::new(2));
        assert_eq!(store.last_id(), Some(b));
        assert_eq!(store.get(a).unwrap().deadline, Height::new(11));
    }

    #[test]
    fn test_record_vote_updates_tally() {
        let (mut store, id) = store_with_one(10);
        store
            .record_vote(id, &Address::new("alice"), true, 3, Height::new(11))
            .unwrap();
        store
            .record_vote(id, &Address::new("bob"), false, 1, Height::new(12))
            .unwrap();

        let p = store.get(id).unwrap();
        assert_eq!((p.yes_weight, p.no_weight), (3, 1));
        assert!(store.has_voted(id, &Address::new("alice")));
        assert!(!store.has_voted(id, &Address::new("carol")));
        assert_eq!(store.vote_of(id, &Address::new("bob")).unwrap().weight, 1);
        assert_eq!(store.votes_for(id).count(), 2);
    }

    #[test]
    fn test_double_vote_rejected_without_side_effects() {
        let (mut store, id) = store_with_one(10);
        let alice = Address::new("alice");
        store.record_vote(id, &alice, true, 3, Height::new(11)).unwrap();

        let err = store.record_vote(id, &alice, false, 3, Height::new(12)).unwrap_err();
        assert_eq!(
            err,
            GovernanceError::AlreadyVoted {
                id,
                voter: alice.clone()
            }
        );
        let p = store.get(id).unwrap();
        assert_eq!((p.yes_weight, p.no_weight), (3, 0));
        assert!(store.vote_of(id, &alice).unwrap().support);
    }

    #[test]
    fn test_vote_at_deadline_is_closed() {
        let (mut store, id) = store_with_one(10);
        let err = store
            .record_vote(id, &Address::new("alice"), true, 1, Height::new(20))
            .unwrap_err();
        assert!(matches!(err, GovernanceError::VotingClosed { .. }));
        assert!(store
            .record_vote(id, &Address::new("alice"), true, 1, Height::new(19))
            .is_ok());
    }

    #[test]
    fn test_vote_on_missing_proposal() {
        let mut store = ProposalStore::new();
        let err = store
            .record_vote(ProposalId::new(7), &Address::new("alice"), true, 1, Height::new(1))
            .unwrap_err();
        assert_eq!(err, GovernanceError::NotFound(ProposalId::new(7)));
    }

    #[test]
    fn test_ensure_executable_checks_in_order() {
        let (mut store, id) = store_with_one(10);
        assert!(matches!(
            store.ensure_executable(id, Height::new(19)),
            Err(GovernanceError::NotYetExpired { .. })
        ));
        assert!(matches!(
            store.ensure_executable(id, Height::new(20)),
            Err(GovernanceError::ProposalRejected { yes: 0, no: 0, .. })
        ));

        store
            .record_vote(id, &Address::new("alice"), true, 1, Height::new(15))
            .unwrap();
        assert!(store.ensure_executable(id, Height::new(20)).is_ok());

        store.mark_executed(id, Height::new(20)).unwrap();
        assert_eq!(
            store.ensure_executable(id, Height::new(21)).unwrap_err(),
            GovernanceError::AlreadyExecuted(id)
        );
        assert_eq!(
            store.mark_executed(id, Height::new(21)).unwrap_err(),
            GovernanceError::AlreadyExecuted(id)
        );
        assert_eq!(store.executed_count(), 1);
    }

    #[test]
    fn test_zero_duration_proposal_never_opens() {
        let (mut store, id) = store_with_one(0);
        assert!(store.active(Height::new(10)).next().is_none());
        assert!(matches!(
            store.record_vote(id, &Address::new("alice"), true, 1, Height::new(10)),
            Err(GovernanceError::VotingClosed { .. })
        ));
    }

    #[test]
    fn test_page_bounds() {
        let mut store = ProposalStore::new();
        let proposer = Address::new("donor1");
        for _ in 0..5 {
            store.create(&proposer, draft(10), Height::new(1)).unwrap();
        }
        let ids = |page: &[Proposal]| page.iter().map(|p| p.id.get()).collect::<Vec<_>>();
        assert_eq!(ids(store.page(0, 2)), vec![1, 2]);
        assert_eq!(ids(store.page(4, 10)), vec![4, 5]);
        assert!(store.page(6, 3).is_empty());
        assert!(store.page(1, 0).is_empty());
    }

    #[test]
    fn test_from_records_roundtrip_and_tally_audit() {
        let (mut store, id) = store_with_one(10);
        store
            .record_vote(id, &Address::new("alice"), true, 3, Height::new(11))
            .unwrap();

        let proposals: Vec<_> = store.iter().cloned().collect();
        let votes: Vec<_> = store.votes_for(id).cloned().collect();
        let rebuilt = ProposalStore::from_records(proposals.clone(), votes.clone()).unwrap();
        assert_eq!(rebuilt.get(id), store.get(id));
        assert!(rebuilt.has_voted(id, &Address::new("alice")));

        let mut tampered = proposals;
        tampered[0].yes_weight = 99;
        assert!(matches!(
            ProposalStore::from_records(tampered, votes),
            Err(StateError::TallyMismatch { .. })
        ));
    }

    #[test]
    fn test_from_records_rejects_orphan_votes() {
        let vote = VoteRecord {
            proposal_id: ProposalId::new(3),
            voter: Address::new("alice"),
            support: true,
            weight: 1,
            cast_at: Height::new(1),
        };
        assert!(matches!(
            ProposalStore::from_records(Vec::new(), vec![vote]),
            Err(StateError::OrphanVote { .. })
        ));
    }
}
