//! Integration tests exercising the full call pipeline:
//! call → engine → write batch → store commit → events → reload.
//!
//! These tests wire the node to both the in-memory store and a real LMDB
//! environment, verifying the system works end-to-end rather than in isolation.

use std::sync::{Arc, Mutex};

use dac_governance::{NewProposal, ProposalStatus};
use dac_ledger::LedgerSnapshot;
use dac_node::{open_lmdb, Call, CallOutcome, DaoEvent, Node, NodeConfig, NodeError};
use dac_nullables::NullStore;
use dac_store::GovernanceStore;
use dac_types::{Address, Amount, ErrorKind, Height, ProposalId, TokenId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ONE: u128 = 1_000_000;

fn null_node() -> Node<NullStore> {
    Node::open(NodeConfig::default(), NullStore::new()).expect("open node")
}

fn lmdb_config(dir: &tempfile::TempDir) -> NodeConfig {
    NodeConfig {
        data_dir: dir.path().join("ledger"),
        map_size_mb: 16,
        ..NodeConfig::default()
    }
}

fn food_bank(amount: u128, duration_blocks: u64) -> Call {
    Call::CreateProposal(NewProposal {
        title: "Help Local Food Bank".into(),
        description: "Provide meals to local community".into(),
        beneficiary: Address::new("beneficiary"),
        requested_amount: Amount::new(amount),
        duration_blocks,
    })
}

fn donate(amount: u128) -> Call {
    Call::Donate {
        amount: Amount::new(amount),
    }
}

fn vote(id: u64, support: bool) -> Call {
    Call::Vote {
        proposal_id: ProposalId::new(id),
        support,
    }
}

fn execute(id: u64) -> Call {
    Call::ExecuteProposal {
        proposal_id: ProposalId::new(id),
    }
}

fn kind_of(result: Result<CallOutcome, NodeError>) -> ErrorKind {
    result
        .expect_err("call should fail")
        .kind()
        .expect("domain error")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn donation_scenario_end_to_end() {
    let mut node = null_node();
    let donor1 = Address::new("donor1");
    let donor2 = Address::new("donor2");

    assert_eq!(
        node.submit(&donor1, donate(ONE)).unwrap(),
        CallOutcome::Donated { credits: 1 }
    );
    assert_eq!(
        node.submit(&donor2, donate(2 * ONE)).unwrap(),
        CallOutcome::Donated { credits: 2 }
    );
    assert_eq!(node.get_donor_tokens(&donor1), 1);
    assert_eq!(node.get_donor_tokens(&donor2), 2);

    assert_eq!(
        node.submit(&donor1, food_bank(ONE, 10)).unwrap(),
        CallOutcome::ProposalCreated {
            proposal_id: ProposalId::FIRST
        }
    );
    assert_eq!(
        node.submit(&donor1, vote(1, true)).unwrap(),
        CallOutcome::Voted { weight: 1 }
    );
    assert!(node.has_voted(ProposalId::FIRST, &donor1));
    assert!(!node.has_voted(ProposalId::FIRST, &donor2));

    node.advance(11).unwrap();
    let outcome = node.submit(&donor1, execute(1)).unwrap();
    let CallOutcome::Executed(disbursement) = outcome else {
        panic!("expected execution");
    };
    assert_eq!(disbursement.amount, Amount::new(ONE));

    let proposal = node.get_proposal(ProposalId::FIRST).unwrap();
    assert!(proposal.executed);
    assert_eq!(proposal.executed_at, Some(Height::new(11)));
    assert_eq!(node.state().ledger.treasury_balance(), Amount::new(2 * ONE));
    assert_eq!(kind_of(node.submit(&donor2, execute(1))), ErrorKind::AlreadyExecuted);
}

#[test]
fn every_rejection_surfaces_its_error_code() {
    let mut node = null_node();
    let donor = Address::new("donor1");
    let stranger = Address::new("stranger");

    assert_eq!(kind_of(node.submit(&donor, donate(ONE - 1))), ErrorKind::InvalidAmount);
    assert_eq!(kind_of(node.submit(&stranger, food_bank(ONE, 5))), ErrorKind::NotAuthorized);

    node.submit(&donor, donate(ONE)).unwrap();
    assert_eq!(kind_of(node.submit(&donor, food_bank(0, 5))), ErrorKind::InvalidAmount);
    assert_eq!(kind_of(node.submit(&donor, vote(1, true))), ErrorKind::NotFound);

    node.submit(&donor, food_bank(5 * ONE, 5)).unwrap();
    assert_eq!(kind_of(node.submit(&stranger, vote(1, true))), ErrorKind::NotAuthorized);
    node.submit(&donor, vote(1, true)).unwrap();
    assert_eq!(kind_of(node.submit(&donor, vote(1, false))), ErrorKind::AlreadyVoted);
    assert_eq!(kind_of(node.submit(&donor, execute(1))), ErrorKind::NotYetExpired);

    node.advance(5).unwrap();
    assert_eq!(kind_of(node.submit(&donor, vote(1, true))), ErrorKind::VotingClosed);
    assert_eq!(kind_of(node.submit(&donor, execute(1))), ErrorKind::InsufficientFunds);

    let mint = Call::MintReceipt {
        metadata_uri: "ipfs://QmExample".into(),
    };
    assert_eq!(kind_of(node.submit(&stranger, mint)), ErrorKind::NotADonor);

    assert_eq!(ErrorKind::InsufficientFunds.code(), 108);
    assert_eq!(ErrorKind::NotADonor.name(), "ERR-NOT-A-DONOR");
}

#[test]
fn rejected_proposal_stays_closed() {
    let mut node = null_node();
    let yes = Address::new("alice");
    let no = Address::new("bob");
    node.submit(&yes, donate(ONE)).unwrap();
    node.submit(&no, donate(3 * ONE)).unwrap();

    node.submit(&yes, food_bank(ONE, 3)).unwrap();
    node.submit(&yes, vote(1, true)).unwrap();
    node.submit(&no, vote(1, false)).unwrap();
    node.advance(3).unwrap();

    for _ in 0..2 {
        assert_eq!(kind_of(node.submit(&yes, execute(1))), ErrorKind::ProposalRejected);
    }
    assert_eq!(node.proposal_status(ProposalId::FIRST).unwrap(), ProposalStatus::Closed);
    assert_eq!(node.state().ledger.treasury_balance(), Amount::new(4 * ONE));
}

#[test]
fn receipts_are_unlimited_for_donors() {
    let mut node = null_node();
    let donor = Address::new("donor1");
    node.submit(&donor, donate(ONE)).unwrap();

    for expected in 1..=3u64 {
        let outcome = node
            .submit(
                &donor,
                Call::MintReceipt {
                    metadata_uri: format!("ipfs://receipt-{expected}"),
                },
            )
            .unwrap();
        assert_eq!(
            outcome,
            CallOutcome::Minted {
                token_id: TokenId::new(expected)
            }
        );
    }
    assert_eq!(node.receipts_of(&donor).len(), 3);
    assert_eq!(
        node.get_receipt(TokenId::new(2)).unwrap().metadata_uri,
        "ipfs://receipt-2"
    );
    assert_eq!(node.fund_stats().receipts, 3);
}

#[test]
fn events_follow_committed_changes() {
    let mut node = null_node();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    node.subscribe(Box::new(move |event| {
        sink.lock().unwrap().push(event.clone());
    }));

    let donor = Address::new("donor1");
    node.submit(&donor, donate(2 * ONE)).unwrap();
    let _ = node.submit(&Address::new("stranger"), vote(1, true));
    node.advance(4).unwrap();

    let events = seen.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            DaoEvent::DonationReceived {
                donor,
                amount: Amount::new(2 * ONE),
                credits: 2,
            },
            DaoEvent::CallRejected {
                sender: Address::new("stranger"),
                kind: ErrorKind::NotAuthorized,
            },
            DaoEvent::HeightAdvanced {
                height: Height::new(4)
            },
        ]
    );
}

#[test]
fn lmdb_state_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let donor1 = Address::new("donor1");
    let donor2 = Address::new("donor2");

    {
        let mut node = open_lmdb(lmdb_config(&dir)).expect("open lmdb node");
        node.submit(&donor1, donate(5 * ONE)).unwrap();
        node.submit(&donor2, donate(3 * ONE)).unwrap();
        node.submit(&donor1, food_bank(2 * ONE, 10)).unwrap();
        node.submit(&donor1, vote(1, true)).unwrap();
        node.submit(&donor2, vote(1, false)).unwrap();
        node.submit(
            &donor2,
            Call::MintReceipt {
                metadata_uri: "ipfs://QmExample".into(),
            },
        )
        .unwrap();
        node.advance(10).unwrap();
        node.submit(&donor2, execute(1)).unwrap();
        assert_eq!(node.store().proposal_count().unwrap(), 1);
    }

    let mut node = open_lmdb(lmdb_config(&dir)).expect("reopen lmdb node");
    assert_eq!(node.height(), Height::new(10));
    assert_eq!(node.get_donor_tokens(&donor1), 5);
    assert_eq!(node.get_donor_tokens(&donor2), 3);
    assert_eq!(node.get_vote(ProposalId::FIRST, &donor2).unwrap().weight, 3);
    assert!(node.get_proposal(ProposalId::FIRST).unwrap().executed);
    assert_eq!(node.receipts_of(&donor2), &[TokenId::FIRST]);
    assert_eq!(node.payouts().unwrap().len(), 1);

    let stats = node.fund_stats();
    assert_eq!(stats.treasury_balance, Amount::new(6 * ONE));
    assert_eq!(stats.total_donated, Amount::new(8 * ONE));
    assert_eq!(stats.total_disbursed, Amount::new(2 * ONE));

    // Replay protection holds across restarts.
    assert_eq!(kind_of(node.submit(&donor1, vote(1, true))), ErrorKind::VotingClosed);
    assert_eq!(kind_of(node.submit(&donor1, execute(1))), ErrorKind::AlreadyExecuted);
    assert_eq!(
        node.submit(&donor1, food_bank(ONE, 1)).unwrap(),
        CallOutcome::ProposalCreated {
            proposal_id: ProposalId::new(2)
        }
    );
}

#[test]
fn snapshot_verifies_and_detects_tampering() {
    let mut node = null_node();
    node.submit(&Address::new("donor1"), donate(7 * ONE)).unwrap();
    node.submit(&Address::new("donor2"), donate(ONE)).unwrap();
    node.advance(3).unwrap();

    let snapshot = node.snapshot();
    assert!(snapshot.verify());
    assert_eq!(snapshot.height, Height::new(3));
    assert_eq!(snapshot.contributor_count(), 2);

    let bytes = snapshot.to_bytes().unwrap();
    let mut decoded = LedgerSnapshot::from_bytes(&bytes).unwrap();
    assert!(decoded.verify());

    decoded.contributors[0].credit_balance += 1;
    assert!(!decoded.verify());

    let restored = snapshot.restore(&node.config().governance).unwrap();
    assert_eq!(restored.treasury_balance(), Amount::new(8 * ONE));
}
