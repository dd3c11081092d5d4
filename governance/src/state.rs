//! The complete governance state handed to every operation.

use dac_ledger::{ContributorAccount, Ledger, TreasuryTotals};
use dac_receipts::{Receipt, ReceiptError, ReceiptRegistry};
use dac_types::{Address, Amount, GovernanceParams, Height, TokenId};
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::proposal::{Proposal, VoteRecord};
use crate::store::ProposalStore;

/// Ledger, proposals and receipts, owned together.
///
/// Nothing here is global: the host owns a `DaoState` and passes it to the
/// engine explicitly.
#[derive(Clone, Debug)]
pub struct DaoState {
    pub ledger: Ledger,
    pub proposals: ProposalStore,
    pub receipts: ReceiptRegistry,
}

/// Aggregate figures for dashboards and the `stats` command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundStats {
    pub treasury_balance: Amount,
    pub total_donated: Amount,
    pub total_disbursed: Amount,
    pub contributors: usize,
    pub total_credits: u128,
    pub proposals: usize,
    pub executed_proposals: usize,
    pub receipts: usize,
}

impl DaoState {
    pub fn new(params: &GovernanceParams) -> Self {
        Self {
            ledger: Ledger::new(params),
            proposals: ProposalStore::new(),
            receipts: ReceiptRegistry::new(params),
        }
    }

    /// Reassemble state from persisted records, auditing each part.
    pub fn restore(
        params: &GovernanceParams,
        accounts: impl IntoIterator<Item = ContributorAccount>,
        totals: TreasuryTotals,
        proposals: impl IntoIterator<Item = Proposal>,
        votes: impl IntoIterator<Item = VoteRecord>,
        receipts: impl IntoIterator<Item = Receipt>,
    ) -> Result<Self, StateError> {
        let state = Self {
            ledger: Ledger::from_parts(params, accounts, totals)?,
            proposals: ProposalStore::from_records(proposals, votes)?,
            receipts: ReceiptRegistry::from_receipts(params, receipts)?,
        };
        tracing::debug!(
            contributors = state.ledger.contributor_count(),
            proposals = state.proposals.len(),
            receipts = state.receipts.len(),
            "governance state restored"
        );
        Ok(state)
    }

    /// Mint a donation receipt for `donor`.
    pub fn mint_receipt(
        &mut self,
        donor: &Address,
        metadata_uri: &str,
        height: Height,
    ) -> Result<TokenId, ReceiptError> {
        self.receipts.mint(&self.ledger, donor, metadata_uri, height)
    }

    pub fn fund_stats(&self) -> FundStats {
        let totals = self.ledger.totals();
        FundStats {
            treasury_balance: totals.balance,
            total_donated: totals.donated,
            total_disbursed: totals.disbursed,
            contributors: self.ledger.contributor_count(),
            total_credits: self.ledger.total_credits(),
            proposals: self.proposals.len(),
            executed_proposals: self.proposals.executed_count(),
            receipts: self.receipts.len(),
        }
    }
}
