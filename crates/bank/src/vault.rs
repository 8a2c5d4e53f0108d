//! Per-borrower vaults
//!
//! One vault per borrower identity, created lazily on the first collateral
//! deposit. A vault is never deleted, only zeroed, so a borrower's position
//! keeps its identity across its whole history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vaultbank_core::Amount;

/// A borrower's collateral/debt position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    /// Collateral deposited and not yet withdrawn or seized
    pub collateral: Amount,
    /// Running debt balance: principal plus accrued interest plus fees
    pub debt: Amount,
    /// Where accrual last caught up to; fractional periods stay pending
    pub last_accrual: DateTime<Utc>,
}

impl Vault {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            collateral: Amount::ZERO,
            debt: Amount::ZERO,
            last_accrual: now,
        }
    }

    /// A vault with no debt places no constraint on its collateral
    pub fn has_debt(&self) -> bool {
        !self.debt.is_zero()
    }
}

/// The per-borrower ledger: borrower identity -> vault state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStore {
    vaults: HashMap<String, Vault>,
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, borrower: &str) -> Option<&Vault> {
        self.vaults.get(borrower)
    }

    pub fn get_mut(&mut self, borrower: &str) -> Option<&mut Vault> {
        self.vaults.get_mut(borrower)
    }

    /// Fetch the borrower's vault, creating an empty one stamped `now`
    pub fn get_or_create(&mut self, borrower: &str, now: DateTime<Utc>) -> &mut Vault {
        self.vaults
            .entry(borrower.to_string())
            .or_insert_with(|| Vault::new(now))
    }

    /// Replace a borrower's vault wholesale (commit of a worked copy)
    pub fn put(&mut self, borrower: &str, vault: Vault) {
        self.vaults.insert(borrower.to_string(), vault);
    }

    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Iterate over (borrower, vault) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vault)> {
        self.vaults.iter().map(|(k, v)| (k.as_str(), v))
    }
}
