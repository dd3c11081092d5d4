//! Block height type used for every deadline in the protocol.
//!
//! Heights are supplied by the execution environment and only ever increase.
//! Nothing in the core reads a wall clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A block height.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Height(u64);

impl Height {
    /// The first height.
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The height `blocks` after this one (saturating).
    pub fn advanced_by(&self, blocks: u64) -> Self {
        Self(self.0.saturating_add(blocks))
    }

    /// Whether `deadline` has been reached at this height.
    pub fn has_reached(&self, deadline: Height) -> bool {
        self.0 >= deadline.0
    }

    /// Blocks remaining until `deadline` (0 once it has been reached).
    pub fn blocks_until(&self, deadline: Height) -> u64 {
        deadline.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
