//! Core governance engine: donations, proposals, voting and execution.
//!
//! Every operation validates against the current state first and mutates
//! second. A call that returns an error has changed nothing.

use dac_types::{Address, Amount, GovernanceParams, Height, ProposalId};

use crate::error::GovernanceError;
use crate::proposal::{Disbursement, NewProposal, Proposal, ProposalStatus, VoteRecord};
use crate::state::{DaoState, FundStats};

pub struct GovernanceEngine {
    params: GovernanceParams,
}

impl GovernanceEngine {
    pub fn new(params: GovernanceParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Accept a donation into the treasury. Returns the donor's new credit
    /// balance.
    pub fn donate(
        &self,
        state: &mut DaoState,
        donor: &Address,
        amount: Amount,
        height: Height,
    ) -> Result<u64, GovernanceError> {
        Ok(state.ledger.credit(donor, amount, height)?)
    }

    /// Open a new proposal. Only holders of governance credits may propose.
    pub fn create_proposal(
        &self,
        state: &mut DaoState,
        proposer: &Address,
        draft: NewProposal,
        height: Height,
    ) -> Result<ProposalId, GovernanceError> {
        if state.ledger.balance_of(proposer) == 0 {
            tracing::debug!(%proposer, "proposal refused: no credits");
            return Err(GovernanceError::NotAuthorized(proposer.clone()));
        }
        if draft.requested_amount.is_zero() {
            return Err(GovernanceError::ZeroRequestedAmount);
        }
        self.validate_text(&draft)?;

        let requested = draft.requested_amount;
        let beneficiary = draft.beneficiary.clone();
        let deadline = height.advanced_by(draft.duration_blocks);
        let id = state.proposals.create(proposer, draft, height)?;

        tracing::info!(%id, %proposer, %beneficiary, %requested, %deadline, "proposal created");
        Ok(id)
    }

    fn validate_text(&self, draft: &NewProposal) -> Result<(), GovernanceError> {
        if draft.title.trim().is_empty() {
            return Err(GovernanceError::InvalidInput("title is empty".into()));
        }
        if draft.title.len() > self.params.max_title_len {
            return Err(GovernanceError::InvalidInput(format!(
                "title exceeds {} bytes",
                self.params.max_title_len
            )));
        }
        if draft.description.len() > self.params.max_description_len {
            return Err(GovernanceError::InvalidInput(format!(
                "description exceeds {} bytes",
                self.params.max_description_len
            )));
        }
        Ok(())
    }

    /// Cast a vote weighted by the voter's current credit balance.
    ///
    /// The weight is frozen into the vote record; donations made afterwards do
    /// not change it. Returns the recorded weight.
    pub fn vote(
        &self,
        state: &mut DaoState,
        id: ProposalId,
        voter: &Address,
        support: bool,
        height: Height,
    ) -> Result<u64, GovernanceError> {
        let weight = state.ledger.balance_of(voter);
        if weight == 0 {
            tracing::debug!(%voter, %id, "vote refused: no credits");
            return Err(GovernanceError::NotAuthorized(voter.clone()));
        }
        state.proposals.record_vote(id, voter, support, weight, height)?;

        tracing::info!(%id, %voter, support, weight, "vote recorded");
        Ok(weight)
    }

    /// Execute a closed, passing proposal and debit the treasury.
    ///
    /// Checks run in a fixed order: existence, deadline, prior execution,
    /// outcome, funds. Any caller may execute.
    pub fn execute_proposal(
        &self,
        state: &mut DaoState,
        id: ProposalId,
        caller: &Address,
        height: Height,
    ) -> Result<Disbursement, GovernanceError> {
        let proposal = state.proposals.ensure_executable(id, height)?;
        let amount = proposal.requested_amount;
        let beneficiary = proposal.beneficiary.clone();
        state.ledger.ensure_can_spend(amount)?;

        state.ledger.spend(amount)?;
        state.proposals.mark_executed(id, height)?;

        tracing::info!(%id, %beneficiary, %amount, executed_by = %caller, "proposal executed");
        Ok(Disbursement {
            proposal_id: id,
            beneficiary,
            amount,
            executed_by: caller.clone(),
            height,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Governance credits held by `address` (zero for strangers).
    pub fn get_donor_tokens(&self, state: &DaoState, address: &Address) -> u64 {
        state.ledger.balance_of(address)
    }

    pub fn get_proposal<'a>(
        &self,
        state: &'a DaoState,
        id: ProposalId,
    ) -> Result<&'a Proposal, GovernanceError> {
        state.proposals.get(id).ok_or(GovernanceError::NotFound(id))
    }

    pub fn has_voted(&self, state: &DaoState, id: ProposalId, voter: &Address) -> bool {
        state.proposals.has_voted(id, voter)
    }

    pub fn get_vote<'a>(
        &self,
        state: &'a DaoState,
        id: ProposalId,
        voter: &Address,
    ) -> Option<&'a VoteRecord> {
        state.proposals.vote_of(id, voter)
    }

    pub fn proposal_status(
        &self,
        state: &DaoState,
        id: ProposalId,
        height: Height,
    ) -> Result<ProposalStatus, GovernanceError> {
        Ok(self.get_proposal(state, id)?.status(height))
    }

    pub fn list_proposals<'a>(&self, state: &'a DaoState, from: u64, count: usize) -> &'a [Proposal] {
        state.proposals.page(from, count)
    }

    pub fn active_proposals<'a>(&self, state: &'a DaoState, height: Height) -> Vec<&'a Proposal> {
        state.proposals.active(height).collect()
    }

    pub fn fund_stats(&self, state: &DaoState) -> FundStats {
        state.fund_stats()
    }
}
