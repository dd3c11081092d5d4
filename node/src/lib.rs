//! Charity governance node: the host that owns the ledger state.
//!
//! The node applies calls one at a time at the current block height, commits
//! each call's effects to the store in a single batch, and notifies
//! subscribers of what changed. Heights only move forward through
//! [`Node::advance`] or the `auto_advance` setting.

pub mod call;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod node;

pub use call::{Call, CallOutcome};
pub use config::NodeConfig;
pub use error::NodeError;
pub use events::{DaoEvent, EventBus};
pub use logging::{init_logging, LogFormat};
pub use node::{open_lmdb, LmdbNode, Node};
