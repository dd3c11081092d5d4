//! Governance parameters: the deploy-time constants of the charity ledger.
//!
//! These are fixed for the lifetime of a deployment; the host loads them from its
//! configuration file and hands them to every engine.

use serde::{Deserialize, Serialize};

use crate::amount::MICRO_PER_TOKEN;
use crate::{Amount, TypesError};

/// Parameters shared by the ledger, governance engine and receipt registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceParams {
    /// Smallest accepted donation. Default: 1 token.
    #[serde(with = "amount_u64")]
    pub min_donation: Amount,

    /// Donation amount that yields one governance credit. Default: 1 token.
    #[serde(with = "amount_u64")]
    pub donation_unit: Amount,

    /// Maximum proposal title length in bytes.
    pub max_title_len: usize,

    /// Maximum proposal description length in bytes.
    pub max_description_len: usize,

    /// Maximum receipt metadata URI length in bytes.
    pub max_uri_len: usize,
}

impl GovernanceParams {
    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.donation_unit.is_zero() {
            return Err(TypesError::InvalidParams(
                "donation_unit must be greater than zero".into(),
            ));
        }
        if self.min_donation.is_zero() {
            return Err(TypesError::InvalidParams(
                "min_donation must be greater than zero".into(),
            ));
        }
        if self.max_title_len == 0 || self.max_uri_len == 0 {
            return Err(TypesError::InvalidParams(
                "text limits must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for GovernanceParams {
    fn default() -> Self {
        Self {
            min_donation: Amount::new(MICRO_PER_TOKEN),
            donation_unit: Amount::new(MICRO_PER_TOKEN),
            max_title_len: 100,
            max_description_len: 500,
            max_uri_len: 256,
        }
    }
}

/// Config formats such as TOML only carry 64-bit integers.
mod amount_u64 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        let raw = u64::try_from(amount.raw()).map_err(serde::ser::Error::custom)?;
        raw.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        u64::deserialize(d).map(|raw| Amount::new(u128::from(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = GovernanceParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.min_donation, Amount::new(1_000_000));
        assert_eq!(params.donation_unit, Amount::new(1_000_000));
    }

    #[test]
    fn zero_unit_rejected() {
        let params = GovernanceParams {
            donation_unit: Amount::ZERO,
            ..GovernanceParams::default()
        };
        assert!(matches!(params.validate(), Err(TypesError::InvalidParams(_))));
    }
}
