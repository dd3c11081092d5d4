//! The node: owns the governance state, applies calls one at a time and
//! persists each call's effects in a single write batch.

use dac_governance::{
    DaoState, Disbursement, FundStats, GovernanceEngine, Proposal, ProposalStatus, VoteRecord,
};
use dac_ledger::{ContributorAccount, LedgerSnapshot, TreasuryTotals};
use dac_receipts::Receipt;
use dac_store::meta::{HEIGHT_KEY, TREASURY_KEY};
use dac_store::{DaoStore, WriteBatch};
use dac_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use dac_types::{Address, Amount, Height, ProposalId, TokenId};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::call::{Call, CallOutcome};
use crate::events::{DaoEvent, EventBus};
use crate::{NodeConfig, NodeError};

/// A single-writer governance node over any [`DaoStore`] backend.
pub struct Node<S: DaoStore> {
    config: NodeConfig,
    engine: GovernanceEngine,
    state: DaoState,
    height: Height,
    store: S,
    events: EventBus,
}

/// A node persisting to LMDB.
pub type LmdbNode = Node<LmdbEnvironment>;

/// Open a node backed by the LMDB environment in `config.data_dir`.
pub fn open_lmdb(config: NodeConfig) -> Result<LmdbNode, NodeError> {
    check_data_dir(&config.data_dir).map_err(NodeError::Corruption)?;
    let env = LmdbEnvironment::open(&config.data_dir, config.map_size_bytes())?;

    let report = check_integrity(&env)?;
    if !report.is_healthy() {
        return Err(NodeError::Corruption(report.errors.join("; ")));
    }
    tracing::debug!(
        databases = report.databases_checked,
        entries = report.total_entries,
        "LMDB integrity check passed"
    );

    Node::open(config, env)
}

impl<S: DaoStore> Node<S> {
    /// Load state from `store` and start serving calls.
    pub fn open(config: NodeConfig, store: S) -> Result<Self, NodeError> {
        config.validate()?;
        let (state, height) = load_state(&store, &config)?;

        tracing::info!(
            %height,
            contributors = state.ledger.contributor_count(),
            proposals = state.proposals.len(),
            receipts = state.receipts.len(),
            treasury = %state.ledger.treasury_balance(),
            "node opened"
        );

        Ok(Self {
            engine: GovernanceEngine::new(config.governance.clone()),
            config,
            state,
            height,
            store,
            events: EventBus::new(),
        })
    }

    /// Apply `call` on behalf of `sender` at the current height.
    ///
    /// On success the call's effects are committed in one batch, events are
    /// emitted, and with `auto_advance` the height moves one block forward.
    /// On failure nothing is changed or persisted.
    pub fn submit(&mut self, sender: &Address, call: Call) -> Result<CallOutcome, NodeError> {
        let name = call.name();
        let height = self.height;

        let applied = match self.apply(sender, call, height) {
            Ok(applied) => applied,
            Err(e) => {
                if let Some(kind) = e.kind() {
                    tracing::debug!(call = name, %sender, %kind, "call rejected");
                    self.events.emit(&DaoEvent::CallRejected {
                        sender: sender.clone(),
                        kind,
                    });
                } else {
                    // Staging failed after the engine applied the call.
                    tracing::warn!(call = name, %sender, error = %e, "staging failed, reloading state");
                    self.reload()?;
                }
                return Err(e);
            }
        };
        let (outcome, mut batch, mut events) = applied;

        let next_height = if self.config.auto_advance {
            let next = height.advanced_by(1);
            batch.put_meta(HEIGHT_KEY, next.as_u64().to_be_bytes().to_vec());
            events.push(DaoEvent::HeightAdvanced { height: next });
            Some(next)
        } else {
            None
        };

        if let Err(e) = self.store.commit(batch) {
            tracing::warn!(call = name, %sender, error = %e, "commit failed, reloading state");
            self.reload()?;
            return Err(e.into());
        }
        if let Some(next) = next_height {
            self.height = next;
        }

        for event in &events {
            self.events.emit(event);
        }
        Ok(outcome)
    }

    /// Discard in-memory state and rebuild it from the store.
    fn reload(&mut self) -> Result<(), NodeError> {
        let (state, height) = load_state(&self.store, &self.config)?;
        self.state = state;
        self.height = height;
        Ok(())
    }

    /// Run `call` against the in-memory state and collect its writes.
    fn apply(
        &mut self,
        sender: &Address,
        call: Call,
        height: Height,
    ) -> Result<(CallOutcome, WriteBatch, Vec<DaoEvent>), NodeError> {
        let mut batch = WriteBatch::new();
        let (outcome, event) = match call {
            Call::Donate { amount } => {
                let credits = self.engine.donate(&mut self.state, sender, amount, height)?;
                self.stage_contributor(&mut batch, sender)?;
                self.stage_treasury(&mut batch)?;
                let event = DaoEvent::DonationReceived {
                    donor: sender.clone(),
                    amount,
                    credits,
                };
                (CallOutcome::Donated { credits }, event)
            }
            Call::CreateProposal(draft) => {
                let proposal_id =
                    self.engine
                        .create_proposal(&mut self.state, sender, draft, height)?;
                let proposal = self.stage_proposal(&mut batch, proposal_id)?;
                let event = DaoEvent::ProposalCreated {
                    id: proposal_id,
                    proposer: sender.clone(),
                    deadline: proposal.deadline,
                };
                (CallOutcome::ProposalCreated { proposal_id }, event)
            }
            Call::Vote {
                proposal_id,
                support,
            } => {
                let weight =
                    self.engine
                        .vote(&mut self.state, proposal_id, sender, support, height)?;
                self.stage_proposal(&mut batch, proposal_id)?;
                if let Some(record) = self.state.proposals.vote_of(proposal_id, sender) {
                    batch.put_vote(proposal_id, sender, encode(record)?);
                }
                let event = DaoEvent::VoteCast {
                    id: proposal_id,
                    voter: sender.clone(),
                    support,
                    weight,
                };
                (CallOutcome::Voted { weight }, event)
            }
            Call::ExecuteProposal { proposal_id } => {
                let disbursement =
                    self.engine
                        .execute_proposal(&mut self.state, proposal_id, sender, height)?;
                self.stage_proposal(&mut batch, proposal_id)?;
                self.stage_treasury(&mut batch)?;
                batch.put_payout(proposal_id, encode(&disbursement)?);
                let event = DaoEvent::ProposalExecuted {
                    id: proposal_id,
                    beneficiary: disbursement.beneficiary.clone(),
                    amount: disbursement.amount,
                };
                (CallOutcome::Executed(disbursement), event)
            }
            Call::MintReceipt { metadata_uri } => {
                let token_id = self.state.mint_receipt(sender, &metadata_uri, height)?;
                if let Some(receipt) = self.state.receipts.get(token_id) {
                    batch.put_receipt(token_id, encode(receipt)?);
                }
                let event = DaoEvent::ReceiptMinted {
                    token_id,
                    owner: sender.clone(),
                };
                (CallOutcome::Minted { token_id }, event)
            }
        };
        Ok((outcome, batch, vec![event]))
    }

    fn stage_contributor(&self, batch: &mut WriteBatch, address: &Address) -> Result<(), NodeError> {
        let account = self.state.ledger.account(address).ok_or_else(|| {
            NodeError::Corruption(format!("account for {address} missing after donation"))
        })?;
        batch.put_contributor(address, encode(account)?);
        Ok(())
    }

    fn stage_treasury(&self, batch: &mut WriteBatch) -> Result<(), NodeError> {
        batch.put_meta(TREASURY_KEY, encode(&self.state.ledger.totals())?);
        Ok(())
    }

    fn stage_proposal(&self, batch: &mut WriteBatch, id: ProposalId) -> Result<&Proposal, NodeError> {
        let proposal = self
            .state
            .proposals
            .get(id)
            .ok_or_else(|| NodeError::Corruption(format!("{id} missing after update")))?;
        batch.put_proposal(id, encode(proposal)?);
        Ok(proposal)
    }

    /// Move the chain forward by `blocks` and persist the new height.
    pub fn advance(&mut self, blocks: u64) -> Result<Height, NodeError> {
        let next = self.height.advanced_by(blocks);
        let mut batch = WriteBatch::new();
        batch.put_meta(HEIGHT_KEY, next.as_u64().to_be_bytes().to_vec());
        self.store.commit(batch)?;

        self.height = next;
        tracing::debug!(height = %next, blocks, "height advanced");
        self.events.emit(&DaoEvent::HeightAdvanced { height: next });
        Ok(next)
    }

    /// Register a listener for committed events.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&DaoEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn state(&self) -> &DaoState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Shut the node down and hand back its store.
    pub fn into_store(self) -> S {
        self.store
    }

    pub fn get_donor_tokens(&self, address: &Address) -> u64 {
        self.engine.get_donor_tokens(&self.state, address)
    }

    pub fn get_contributor(&self, address: &Address) -> Option<&ContributorAccount> {
        self.state.ledger.account(address)
    }

    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal, NodeError> {
        Ok(self.engine.get_proposal(&self.state, id)?)
    }

    pub fn proposal_status(&self, id: ProposalId) -> Result<ProposalStatus, NodeError> {
        Ok(self.engine.proposal_status(&self.state, id, self.height)?)
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.engine.has_voted(&self.state, id, voter)
    }

    pub fn get_vote(&self, id: ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.engine.get_vote(&self.state, id, voter)
    }

    pub fn list_proposals(&self, from: u64, count: usize) -> &[Proposal] {
        self.engine.list_proposals(&self.state, from, count)
    }

    pub fn active_proposals(&self) -> Vec<&Proposal> {
        self.engine.active_proposals(&self.state, self.height)
    }

    pub fn get_receipt(&self, token_id: TokenId) -> Option<&Receipt> {
        self.state.receipts.get(token_id)
    }

    pub fn receipts_of(&self, owner: &Address) -> &[TokenId] {
        self.state.receipts.tokens_of(owner)
    }

    pub fn fund_stats(&self) -> FundStats {
        self.engine.fund_stats(&self.state)
    }

    pub fn get_payout(&self, id: ProposalId) -> Result<Option<Disbursement>, NodeError> {
        self.store
            .get_payout(id)?
            .map(|bytes| decode(&bytes))
            .transpose()
    }

    pub fn payouts(&self) -> Result<Vec<Disbursement>, NodeError> {
        decode_all(self.store.iter_payouts()?)
    }

    /// Total disbursed to `beneficiary` across all executed proposals.
    pub fn received_by(&self, beneficiary: &Address) -> Result<Amount, NodeError> {
        self.payouts()?
            .iter()
            .filter(|p| &p.beneficiary == beneficiary)
            .try_fold(Amount::ZERO, |acc, p| acc.checked_add(p.amount))
            .ok_or_else(|| NodeError::Corruption("payout total overflows".into()))
    }

    /// An audit snapshot of contributor balances and the treasury.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::create(&self.state.ledger, self.height)
    }
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, NodeError> {
    Ok(bincode::serialize(value)?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, NodeError> {
    Ok(bincode::deserialize(bytes)?)
}

fn decode_all<T: DeserializeOwned>(rows: Vec<Vec<u8>>) -> Result<Vec<T>, NodeError> {
    rows.iter().map(|bytes| decode(bytes)).collect()
}

/// Rebuild [`DaoState`] and the current height from persisted records.
fn load_state<S: DaoStore>(store: &S, config: &NodeConfig) -> Result<(DaoState, Height), NodeError> {
    let params = &config.governance;

    let height = match store.get_meta(HEIGHT_KEY)? {
        None => Height::GENESIS,
        Some(bytes) => {
            let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                NodeError::Corruption(format!("height record has {} bytes", bytes.len()))
            })?;
            Height::new(u64::from_be_bytes(raw))
        }
    };
    let totals: TreasuryTotals = match store.get_meta(TREASURY_KEY)? {
        None => TreasuryTotals::default(),
        Some(bytes) => decode(&bytes)?,
    };

    let accounts: Vec<ContributorAccount> = decode_all(store.iter_contributors()?)?;
    let proposals: Vec<Proposal> = decode_all(store.iter_proposals()?)?;
    let votes: Vec<VoteRecord> = decode_all(store.iter_votes()?)?;
    let receipts: Vec<Receipt> = decode_all(store.iter_receipts()?)?;
    let payouts: Vec<Disbursement> = decode_all(store.iter_payouts()?)?;

    let paid = payouts
        .iter()
        .try_fold(Amount::ZERO, |acc, p| acc.checked_add(p.amount))
        .ok_or_else(|| NodeError::Corruption("payout total overflows".into()))?;
    if paid != totals.disbursed {
        return Err(NodeError::Corruption(format!(
            "payouts sum to {paid} but the treasury recorded {} disbursed",
            totals.disbursed
        )));
    }

    let state = DaoState::restore(params, accounts, totals, proposals, votes, receipts)?;
    Ok((state, height))
}
