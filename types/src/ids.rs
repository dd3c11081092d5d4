//! Sequential record identifiers.
//!
//! Proposals and receipts live in append-only tables; the identifier is the
//! 1-based position in that table, so ids are dense, start at 1 and are never
//! reused.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const FIRST: Self = Self(1);

            pub fn new(id: u64) -> Self {
                Self(id)
            }

            pub fn get(&self) -> u64 {
                self.0
            }

            /// The id stored at 0-based table position `index`.
            pub fn from_index(index: usize) -> Self {
                Self(index as u64 + 1)
            }

            /// 0-based table position, or `None` for the invalid id 0.
            pub fn index(&self) -> Option<usize> {
                self.0.checked_sub(1).map(|i| i as usize)
            }

            /// Big-endian bytes, so stored keys sort in id order.
            pub fn to_key(&self) -> [u8; 8] {
                self.0.to_be_bytes()
            }

            pub fn from_key(key: [u8; 8]) -> Self {
                Self(u64::from_be_bytes(key))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "{}"), self.0)
            }
        }
    };
}

sequential_id!(
    /// Identifier of a governance proposal.
    ProposalId,
    "proposal-"
);

sequential_id!(
    /// Identifier of a donation receipt token.
    TokenId,
    "token-"
);
