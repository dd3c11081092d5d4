//! The contributor ledger and treasury.
//!
//! Every mutation validates first and mutates second, so a failed call leaves
//! the ledger untouched.

use std::collections::BTreeMap;

use dac_types::{Address, Amount, GovernanceParams, Height};
use serde::{Deserialize, Serialize};

use crate::account::ContributorAccount;
use crate::error::{AuditError, LedgerError};

/// Treasury bookkeeping. `balance == donated - disbursed` at all times.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTotals {
    /// Spendable balance.
    pub balance: Amount,
    /// Sum of every accepted donation.
    pub donated: Amount,
    /// Sum of every executed disbursement.
    pub disbursed: Amount,
}

/// Contributor accounts plus the pooled treasury they fund.
#[derive(Clone, Debug)]
pub struct Ledger {
    min_donation: Amount,
    donation_unit: Amount,
    accounts: BTreeMap<Address, ContributorAccount>,
    totals: TreasuryTotals,
}

impl Ledger {
    /// An empty ledger governed by `params`.
    pub fn new(params: &GovernanceParams) -> Self {
        Self {
            min_donation: params.min_donation,
            donation_unit: params.donation_unit,
            accounts: BTreeMap::new(),
            totals: TreasuryTotals::default(),
        }
    }

    /// Rebuild a ledger from persisted records, checking every invariant.
    pub fn from_parts(
        params: &GovernanceParams,
        accounts: impl IntoIterator<Item = ContributorAccount>,
        totals: TreasuryTotals,
    ) -> Result<Self, AuditError> {
        let mut ledger = Self::new(params);
        for account in accounts {
            if ledger.accounts.contains_key(&account.address) {
                return Err(AuditError::DuplicateContributor(account.address));
            }
            ledger.accounts.insert(account.address.clone(), account);
        }
        ledger.totals = totals;
        ledger.audit()?;
        Ok(ledger)
    }

    /// Accept a donation and return the donor's new credit balance.
    ///
    /// Fails with [`LedgerError::InvalidAmount`] below the minimum donation.
    pub fn credit(
        &mut self,
        donor: &Address,
        amount: Amount,
        height: Height,
    ) -> Result<u64, LedgerError> {
        if amount < self.min_donation {
            tracing::debug!(%donor, %amount, "donation below minimum rejected");
            return Err(LedgerError::InvalidAmount {
                amount,
                minimum: self.min_donation,
            });
        }

        let previous = self.cumulative_donated(donor);
        let cumulative = previous.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let balance = self
            .totals
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let donated = self
            .totals
            .donated
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let credits = u64::try_from(cumulative.units_of(self.donation_unit))
            .map_err(|_| LedgerError::Overflow)?;

        let account = self
            .accounts
            .entry(donor.clone())
            .or_insert_with(|| ContributorAccount {
                address: donor.clone(),
                cumulative_donated: Amount::ZERO,
                credit_balance: 0,
                donation_count: 0,
                first_donation_at: height,
                last_donation_at: height,
            });
        account.cumulative_donated = cumulative;
        account.credit_balance = credits;
        account.donation_count = account.donation_count.saturating_add(1);
        account.last_donation_at = height;
        self.totals.balance = balance;
        self.totals.donated = donated;

        tracing::info!(%donor, %amount, credits, treasury = %balance, "donation credited");
        Ok(credits)
    }

    /// Current credit balance (0 for unknown addresses).
    pub fn balance_of(&self, address: &Address) -> u64 {
        self.accounts
            .get(address)
            .map_or(0, |account| account.credit_balance)
    }

    /// Total donated by `address` (zero for unknown addresses).
    pub fn cumulative_donated(&self, address: &Address) -> Amount {
        self.accounts
            .get(address)
            .map_or(Amount::ZERO, |account| account.cumulative_donated)
    }

    /// Check that the treasury can cover `amount` without touching it.
    pub fn ensure_can_spend(&self, amount: Amount) -> Result<(), LedgerError> {
        if self.totals.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available: self.totals.balance,
            });
        }
        self.totals
            .disbursed
            .checked_add(amount)
            .map(|_| ())
            .ok_or(LedgerError::Overflow)
    }

    /// Withdraw `amount` from the treasury and return the remaining balance.
    pub fn spend(&mut self, amount: Amount) -> Result<Amount, LedgerError> {
        self.ensure_can_spend(amount)?;
        let disbursed = self
            .totals
            .disbursed
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.totals.balance = self.totals.balance.saturating_sub(amount);
        self.totals.disbursed = disbursed;
        tracing::info!(%amount, treasury = %self.totals.balance, "treasury spent");
        Ok(self.totals.balance)
    }

    pub fn account(&self, address: &Address) -> Option<&ContributorAccount> {
        self.accounts.get(address)
    }

    /// All contributor accounts, ordered by address.
    pub fn accounts(&self) -> impl Iterator<Item = &ContributorAccount> {
        self.accounts.values()
    }

    pub fn contributor_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn treasury_balance(&self) -> Amount {
        self.totals.balance
    }

    pub fn totals(&self) -> TreasuryTotals {
        self.totals
    }

    /// Sum of every contributor's credits.
    pub fn total_credits(&self) -> u128 {
        self.accounts
            .values()
            .map(|account| u128::from(account.credit_balance))
            .sum()
    }

    pub fn donation_unit(&self) -> Amount {
        self.donation_unit
    }

    pub fn min_donation(&self) -> Amount {
        self.min_donation
    }

    /// Verify every accounting invariant.
    pub fn audit(&self) -> Result<(), AuditError> {
        let mut sum = Amount::ZERO;
        for account in self.accounts.values() {
            if !account.credits_consistent(self.donation_unit) {
                return Err(AuditError::CreditMismatch {
                    address: account.address.clone(),
                    recorded: account.credit_balance,
                    expected: account.cumulative_donated.units_of(self.donation_unit),
                });
            }
            sum = sum
                .checked_add(account.cumulative_donated)
                .ok_or(AuditError::DonationTotalMismatch {
                    sum,
                    recorded: self.totals.donated,
                })?;
        }
        if sum != self.totals.donated {
            return Err(AuditError::DonationTotalMismatch {
                sum,
                recorded: self.totals.donated,
            });
        }
        let TreasuryTotals {
            balance,
            donated,
            disbursed,
        } = self.totals;
        if donated.checked_sub(disbursed) != Some(balance) {
            return Err(AuditError::TreasuryMismatch {
                treasury: balance,
                donated,
                disbursed,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> Ledger {
        Ledger::new(&GovernanceParams::default())
    }

    fn donor(name: &str) -> Address {
        Address::new(name)
    }

    #[test]
    fn test_donation_below_minimum_rejected() {
        let mut ledger = ledger();
        let err = ledger
            .credit(&donor("alice"), Amount::new(500_000), Height::new(1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert_eq!(ledger.balance_of(&donor("alice")), 0);
        assert_eq!(ledger.treasury_balance(), Amount::ZERO);
        assert!(ledger.account(&donor("alice")).is_none());
    }

    #[test]
    fn test_credit_floor_division() {
        let mut ledger = ledger();
        assert_eq!(
            ledger
                .credit(&donor("alice"), Amount::new(1_000_000), Height::new(1))
                .unwrap(),
            1
        );
        assert_eq!(
            ledger
                .credit(&donor("bob"), Amount::new(2_000_000), Height::new(2))
                .unwrap(),
            2
        );
        assert_eq!(
            ledger
                .credit(&donor("carol"), Amount::new(1_999_999), Height::new(3))
                .unwrap(),
            1
        );
    }

    #[test]
    fn test_cumulative_donations_recompute_credits() {
        let mut ledger = ledger();
        let alice = donor("alice");
        ledger
            .credit(&alice, Amount::new(1_500_000), Height::new(1))
            .unwrap();
        assert_eq!(ledger.balance_of(&alice), 1);
        let credits = ledger
            .credit(&alice, Amount::new(1_500_000), Height::new(5))
            .unwrap();
        assert_eq!(credits, 3);

        let account = ledger.account(&alice).unwrap();
        assert_eq!(account.cumulative_donated, Amount::new(3_000_000));
        assert_eq!(account.donation_count, 2);
        assert_eq!(account.first_donation_at, Height::new(1));
        assert_eq!(account.last_donation_at, Height::new(5));
        assert_eq!(ledger.treasury_balance(), Amount::new(3_000_000));
    }

    #[test]
    fn test_unknown_address_has_zero_balance() {
        let ledger = ledger();
        assert_eq!(ledger.balance_of(&donor("nobody")), 0);
        assert_eq!(ledger.cumulative_donated(&donor("nobody")), Amount::ZERO);
    }

    #[test]
    fn test_spend_insufficient_funds_leaves_treasury() {
        let mut ledger = ledger();
        ledger
            .credit(&donor("alice"), Amount::new(1_000_000), Height::new(1))
            .unwrap();
        let err = ledger.spend(Amount::new(1_000_001)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientFunds {
                needed: Amount::new(1_000_001),
                available: Amount::new(1_000_000),
            }
        );
        assert_eq!(ledger.treasury_balance(), Amount::new(1_000_000));
    }

    #[test]
    fn test_spend_reduces_treasury_not_credits() {
        let mut ledger = ledger();
        let alice = donor("alice");
        ledger
            .credit(&alice, Amount::new(3_000_000), Height::new(1))
            .unwrap();
        let remaining = ledger.spend(Amount::new(1_000_000)).unwrap();
        assert_eq!(remaining, Amount::new(2_000_000));
        assert_eq!(ledger.balance_of(&alice), 3);
        assert_eq!(ledger.totals().disbursed, Amount::new(1_000_000));
        assert!(ledger.audit().is_ok());
    }

    #[test]
    fn test_from_parts_rejects_bad_credits() {
        let params = GovernanceParams::default();
        let account = ContributorAccount {
            address: donor("alice"),
            cumulative_donated: Amount::new(2_000_000),
            credit_balance: 5,
            donation_count: 1,
            first_donation_at: Height::new(1),
            last_donation_at: Height::new(1),
        };
        let totals = TreasuryTotals {
            balance: Amount::new(2_000_000),
            donated: Amount::new(2_000_000),
            disbursed: Amount::ZERO,
        };
        let err = Ledger::from_parts(&params, vec![account], totals).unwrap_err();
        assert!(matches!(err, AuditError::CreditMismatch { recorded: 5, .. }));
    }

    #[test]
    fn test_from_parts_rejects_treasury_mismatch() {
        let params = GovernanceParams::default();
        let totals = TreasuryTotals {
            balance: Amount::new(10),
            donated: Amount::ZERO,
            disbursed: Amount::ZERO,
        };
        let err = Ledger::from_parts(&params, Vec::new(), totals).unwrap_err();
        assert!(matches!(err, AuditError::TreasuryMismatch { .. }));
    }

    #[test]
    fn test_from_parts_roundtrip() {
        let mut ledger = ledger();
        ledger
            .credit(&donor("alice"), Amount::new(4_200_000), Height::new(1))
            .unwrap();
        ledger.spend(Amount::new(200_000)).unwrap();

        let rebuilt = Ledger::from_parts(
            &GovernanceParams::default(),
            ledger.accounts().cloned(),
            ledger.totals(),
        )
        .unwrap();
        assert_eq!(rebuilt.balance_of(&donor("alice")), 4);
        assert_eq!(rebuilt.treasury_balance(), Amount::new(4_000_000));
    }
}
