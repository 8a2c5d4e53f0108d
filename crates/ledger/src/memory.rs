//! In-memory ledger for testing
//!
//! Keeps one balance per (asset, account) pair behind a single lock so a
//! transfer debits and credits in one step. `mint` seeds balances and
//! `freeze` forces the unauthorized path, so tests can reach every
//! `TransferError` variant.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use vaultbank_core::{Amount, AssetCode};

use crate::error::TransferError;
use crate::transfer::AssetLedger;

/// Deterministic in-memory implementation of [`AssetLedger`]
#[derive(Default)]
pub struct InMemoryLedger {
    /// Balance per (asset, account)
    balances: RwLock<HashMap<(AssetCode, String), Decimal>>,
    /// Accounts that refuse all outgoing transfers
    frozen: RwLock<HashSet<String>>,
}

impl InMemoryLedger {
    /// Create a new empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air (test setup)
    pub fn mint(&self, asset: &AssetCode, account: &str, amount: Amount) {
        let mut balances = self.balances.write().unwrap();
        let entry = balances
            .entry((asset.clone(), account.to_string()))
            .or_insert(Decimal::ZERO);
        *entry += amount.value();
    }

    /// Refuse all further outgoing transfers from an account
    pub fn freeze(&self, account: &str) {
        self.frozen.write().unwrap().insert(account.to_string());
    }

    /// Lift a freeze
    pub fn unfreeze(&self, account: &str) {
        self.frozen.write().unwrap().remove(account);
    }
}

#[async_trait]
impl AssetLedger for InMemoryLedger {
    async fn transfer(
        &self,
        asset: &AssetCode,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.frozen.read().unwrap().contains(from) {
            return Err(TransferError::Unauthorized {
                account: from.to_string(),
            });
        }

        // One write lock for the whole debit+credit: a failed transfer
        // changes nothing, a successful one changes both sides.
        let mut balances = self.balances.write().unwrap();

        let from_key = (asset.clone(), from.to_string());
        let available = balances.get(&from_key).copied().unwrap_or(Decimal::ZERO);
        if available < amount.value() {
            return Err(TransferError::InsufficientFunds {
                account: from.to_string(),
                asset: asset.to_string(),
                available: available.to_string(),
                required: amount.to_string(),
            });
        }

        *balances.entry(from_key).or_insert(Decimal::ZERO) -= amount.value();
        *balances
            .entry((asset.clone(), to.to_string()))
            .or_insert(Decimal::ZERO) += amount.value();

        Ok(())
    }

    async fn balance_of(&self, asset: &AssetCode, account: &str) -> Amount {
        let balances = self.balances.read().unwrap();
        let value = balances
            .get(&(asset.clone(), account.to_string()))
            .copied()
            .unwrap_or(Decimal::ZERO);
        Amount::new_unchecked(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn usdc() -> AssetCode {
        "USDC".parse().unwrap()
    }

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_mint_and_balance() {
        let ledger = InMemoryLedger::new();
        ledger.mint(&usdc(), "ALICE", amount(dec!(100)));

        assert_eq!(ledger.balance_of(&usdc(), "ALICE").await.value(), dec!(100));
        assert_eq!(ledger.balance_of(&usdc(), "BOB").await.value(), dec!(0));
    }

    #[tokio::test]
    async fn test_transfer_moves_both_sides() {
        let ledger = InMemoryLedger::new();
        ledger.mint(&usdc(), "ALICE", amount(dec!(100)));

        ledger
            .transfer(&usdc(), "ALICE", "BOB", amount(dec!(40)))
            .await
            .unwrap();

        assert_eq!(ledger.balance_of(&usdc(), "ALICE").await.value(), dec!(60));
        assert_eq!(ledger.balance_of(&usdc(), "BOB").await.value(), dec!(40));
    }

    #[tokio::test]
    async fn test_transfer_insufficient_funds_is_noop() {
        let ledger = InMemoryLedger::new();
        ledger.mint(&usdc(), "ALICE", amount(dec!(30)));

        let result = ledger
            .transfer(&usdc(), "ALICE", "BOB", amount(dec!(40)))
            .await;

        assert!(matches!(
            result,
            Err(TransferError::InsufficientFunds { .. })
        ));
        assert_eq!(ledger.balance_of(&usdc(), "ALICE").await.value(), dec!(30));
        assert_eq!(ledger.balance_of(&usdc(), "BOB").await.value(), dec!(0));
    }

    #[tokio::test]
    async fn test_frozen_account_is_unauthorized() {
        let ledger = InMemoryLedger::new();
        ledger.mint(&usdc(), "ALICE", amount(dec!(100)));
        ledger.freeze("ALICE");

        let result = ledger
            .transfer(&usdc(), "ALICE", "BOB", amount(dec!(10)))
            .await;
        assert!(matches!(result, Err(TransferError::Unauthorized { .. })));

        ledger.unfreeze("ALICE");
        assert!(ledger
            .transfer(&usdc(), "ALICE", "BOB", amount(dec!(10)))
            .await
            .is_ok());
    }
}
