//! Forced closure of undercollateralized vaults
//!
//! Converts the penalized debt into an equivalent collateral quantity,
//! seizes it (capped at what the vault holds), carves out the protocol fee
//! and reports what the reserve recovered. Eligibility is decided by the
//! caller; this module only computes the outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vaultbank_core::math;
use vaultbank_core::Amount;

use crate::error::BankError;
use crate::vault::Vault;

/// Share of seized collateral paid to the fee recipient (1/10)
const PROTOCOL_FEE_DIVISOR: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// What a liquidation did (or would do) to a vault
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationOutcome {
    /// Borrower whose vault was closed
    pub borrower: String,
    /// Debt balance written off the vault
    pub debt_cleared: Amount,
    /// Debt inflated by the liquidation penalty
    pub debt_owed: Amount,
    /// Collateral taken from the vault, capped at what it held
    pub collateral_seized: Amount,
    /// Share of the seized collateral paid to the fee recipient
    pub protocol_fee: Amount,
    /// Debt value the reserve recovered from the seizure
    pub debt_recovered: Amount,
    /// Debt value the seizure could not cover (written off)
    pub shortfall: Amount,
    /// Whether the vault held enough collateral for the full seizure
    pub is_full: bool,
}

/// Compute the effects of liquidating `vault` at the given prices.
///
/// The vault must already be accrued and known to be eligible.
pub fn plan(
    borrower: &str,
    vault: &Vault,
    liquidation_penalty_pct: u64,
    collateral_price: Decimal,
    debt_price: Decimal,
) -> Result<LiquidationOutcome, BankError> {
    let overflow = |context| BankError::ArithmeticOverflow { context };

    let inflation_pct = 100u64
        .checked_add(liquidation_penalty_pct)
        .ok_or_else(|| overflow("liquidation penalty"))?;
    let debt_owed = math::percent_of(vault.debt.value(), inflation_pct)
        .ok_or_else(|| overflow("penalized debt"))?;

    // Convert the owed debt value into a collateral quantity, then cap at
    // what the vault actually holds.
    let seize_target = debt_owed
        .checked_mul(debt_price)
        .and_then(|v| v.checked_div(collateral_price))
        .ok_or_else(|| overflow("collateral seizure"))?;
    let collateral_seized = Amount::new_unchecked(seize_target).min(vault.collateral);
    let is_full = seize_target <= vault.collateral.value();

    let protocol_fee = collateral_seized
        .value()
        .checked_div(PROTOCOL_FEE_DIVISOR)
        .map(Amount::new_unchecked)
        .ok_or_else(|| overflow("protocol fee"))?;

    // The seized value, back in debt-asset terms, is what the reserve
    // recovers; anything above the owed debt never existed to recover.
    let recovered_value = collateral_seized
        .value()
        .checked_mul(collateral_price)
        .and_then(|v| v.checked_div(debt_price))
        .ok_or_else(|| overflow("recovered value"))?;
    let debt_recovered = Amount::new_unchecked(recovered_value.min(debt_owed));

    let shortfall = Amount::new_unchecked(debt_owed)
        .checked_sub(debt_recovered)
        .ok_or_else(|| overflow("liquidation shortfall"))?;

    Ok(LiquidationOutcome {
        borrower: borrower.to_string(),
        debt_cleared: vault.debt,
        debt_owed: Amount::new_unchecked(debt_owed),
        collateral_seized,
        protocol_fee,
        debt_recovered,
        shortfall,
        is_full,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn vault(collateral: Decimal, debt: Decimal) -> Vault {
        let mut v = Vault::new(Utc::now());
        v.collateral = Amount::new(collateral).unwrap();
        v.debt = Amount::new(debt).unwrap();
        v
    }

    #[test]
    fn test_full_liquidation_equal_prices() {
        let v = vault(dec!(100), dec!(80));
        let outcome = plan("ALICE", &v, 5, dec!(1), dec!(1)).unwrap();

        assert_eq!(outcome.debt_owed.value(), dec!(84));
        assert_eq!(outcome.collateral_seized.value(), dec!(84));
        assert_eq!(outcome.protocol_fee.value(), dec!(8.4));
        assert_eq!(outcome.debt_recovered.value(), dec!(84));
        assert!(outcome.shortfall.is_zero());
        assert!(outcome.is_full);
    }

    #[test]
    fn test_seizure_capped_at_vault_collateral() {
        let v = vault(dec!(50), dec!(80));
        let outcome = plan("ALICE", &v, 5, dec!(1), dec!(1)).unwrap();

        assert_eq!(outcome.collateral_seized.value(), dec!(50));
        assert_eq!(outcome.protocol_fee.value(), dec!(5));
        assert_eq!(outcome.debt_recovered.value(), dec!(50));
        assert_eq!(outcome.shortfall.value(), dec!(34));
        assert!(!outcome.is_full);
    }

    #[test]
    fn test_price_conversion() {
        // 80 debt at price 2 owed with 5% penalty = 84 debt units worth 168;
        // collateral priced at 4 => seize 42 collateral units
        let v = vault(dec!(100), dec!(80));
        let outcome = plan("ALICE", &v, 5, dec!(4), dec!(2)).unwrap();

        assert_eq!(outcome.collateral_seized.value(), dec!(42));
        assert_eq!(outcome.debt_recovered.value(), dec!(84));
        assert!(outcome.is_full);
    }

    #[test]
    fn test_zero_penalty() {
        let v = vault(dec!(100), dec!(80));
        let outcome = plan("ALICE", &v, 0, dec!(1), dec!(1)).unwrap();
        assert_eq!(outcome.debt_owed.value(), dec!(80));
        assert_eq!(outcome.collateral_seized.value(), dec!(80));
    }
}
