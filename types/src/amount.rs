//! Token amount type.
//!
//! Amounts are represented as fixed-point integers (u128) to avoid floating-point errors.
//! The smallest unit is 1 micro; one whole token is [`MICRO_PER_TOKEN`] micro.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Micro-units per whole token.
pub const MICRO_PER_TOKEN: u128 = 1_000_000;

/// An amount of the native token, in micro-units.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// Amount from a count of whole tokens (saturating).
    pub fn from_tokens(tokens: u128) -> Self {
        Self(tokens.saturating_mul(MICRO_PER_TOKEN))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    /// Whole tokens contained in this amount, rounded down.
    pub fn to_tokens(&self) -> u128 {
        self.0 / MICRO_PER_TOKEN
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// How many whole `unit`s fit in this amount (floor division).
    ///
    /// A zero unit yields zero rather than dividing by zero.
    pub fn units_of(&self, unit: Amount) -> u128 {
        if unit.is_zero() {
            0
        } else {
            self.0 / unit.0
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} micro", self.0)
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}
