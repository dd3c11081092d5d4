//! Events emitted after a call's effects have been committed.

use dac_types::{Address, Amount, ErrorKind, Height, ProposalId, TokenId};
use serde::Serialize;

/// Observable state changes. Emitted only after the store commit succeeded,
/// in the order the changes were applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum DaoEvent {
    DonationReceived {
        donor: Address,
        amount: Amount,
        credits: u64,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        deadline: Height,
    },
    VoteCast {
        id: ProposalId,
        voter: Address,
        support: bool,
        weight: u64,
    },
    ProposalExecuted {
        id: ProposalId,
        beneficiary: Address,
        amount: Amount,
    },
    ReceiptMinted {
        token_id: TokenId,
        owner: Address,
    },
    HeightAdvanced {
        height: Height,
    },
    /// A call failed validation; nothing was changed.
    CallRejected {
        sender: Address,
        kind: ErrorKind,
    },
}

type Listener = Box<dyn Fn(&DaoEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast to
/// avoid stalling call processing.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &DaoEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
