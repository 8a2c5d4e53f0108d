//! The bank's own pooled balances

use serde::{Deserialize, Serialize};
use vaultbank_core::Amount;

/// Reserve balances funding loans and receiving repayments.
///
/// Mutated only as the counterparty of reserve deposits/withdrawals and of
/// every borrow, repay and liquidation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveAccount {
    /// Debt asset available for lending
    pub debt_asset_balance: Amount,
    /// Collateral seized through liquidations
    pub collateral_asset_balance: Amount,
}

impl ReserveAccount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Can the reserve fund a loan of `amount`?
    pub fn can_fund(&self, amount: Amount) -> bool {
        amount <= self.debt_asset_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_starts_empty() {
        let reserve = ReserveAccount::new();
        assert!(reserve.debt_asset_balance.is_zero());
        assert!(reserve.collateral_asset_balance.is_zero());
    }

    #[test]
    fn test_can_fund() {
        let reserve = ReserveAccount {
            debt_asset_balance: Amount::new(dec!(100)).unwrap(),
            collateral_asset_balance: Amount::ZERO,
        };
        assert!(reserve.can_fund(Amount::new(dec!(100)).unwrap()));
        assert!(!reserve.can_fund(Amount::new(dec!(100.01)).unwrap()));
    }
}
