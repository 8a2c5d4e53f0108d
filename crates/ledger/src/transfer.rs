//! The asset-transfer capability consumed by the bank

use async_trait::async_trait;
use vaultbank_core::{Amount, AssetCode};

use crate::TransferError;

/// Asset Ledger trait - interface to the external value-transfer system
///
/// A transfer moves `amount` of `asset` from one party to another and is
/// all-or-nothing: on error, no balance anywhere has changed. The bank
/// issues transfers only after its own checks pass and commits its internal
/// state only after the transfer succeeded.
#[async_trait]
pub trait AssetLedger: Send + Sync {
    /// Move `amount` of `asset` from `from` to `to`, atomically
    async fn transfer(
        &self,
        asset: &AssetCode,
        from: &str,
        to: &str,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Externally-tracked balance of an account
    async fn balance_of(&self, asset: &AssetCode, account: &str) -> Amount;
}
