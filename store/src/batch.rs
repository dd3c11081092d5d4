//! Backend-agnostic write batches.
//!
//! A [`WriteBatch`] collects every record one call touches. Backends apply it
//! atomically: either every write lands or none does.

use crate::StoreError;
use dac_types::{Address, ProposalId, TokenId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Contributor { address: Address, data: Vec<u8> },
    Proposal { id: ProposalId, data: Vec<u8> },
    Vote { proposal: ProposalId, voter: Address, data: Vec<u8> },
    Receipt { token_id: TokenId, data: Vec<u8> },
    Payout { proposal: ProposalId, data: Vec<u8> },
    Meta { key: String, data: Vec<u8> },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_contributor(&mut self, address: &Address, data: Vec<u8>) {
        self.ops.push(WriteOp::Contributor {
            address: address.clone(),
            data,
        });
    }

    pub fn put_proposal(&mut self, id: ProposalId, data: Vec<u8>) {
        self.ops.push(WriteOp::Proposal { id, data });
    }

    pub fn put_vote(&mut self, proposal: ProposalId, voter: &Address, data: Vec<u8>) {
        self.ops.push(WriteOp::Vote {
            proposal,
            voter: voter.clone(),
            data,
        });
    }

    pub fn put_receipt(&mut self, token_id: TokenId, data: Vec<u8>) {
        self.ops.push(WriteOp::Receipt { token_id, data });
    }

    pub fn put_payout(&mut self, proposal: ProposalId, data: Vec<u8>) {
        self.ops.push(WriteOp::Payout { proposal, data });
    }

    pub fn put_meta(&mut self, key: &str, data: Vec<u8>) {
        self.ops.push(WriteOp::Meta {
            key: key.to_string(),
            data,
        });
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Atomic application of a [`WriteBatch`].
pub trait BatchStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
