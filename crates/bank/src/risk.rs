//! Collateralization checks
//!
//! The single invariant the engine enforces: whenever a vault carries debt,
//! its collateral value must stay at or above the configured minimum ratio.
//! Ratios are basis points of percent (150% == 15_000).

use rust_decimal::Decimal;
use vaultbank_core::math;
use vaultbank_core::Amount;

use crate::error::BankError;

/// Collateralization ratio of a position, in basis points of percent.
///
/// `None` means the vault has no debt: the ratio is undefined and the
/// position is unconditionally healthy.
pub fn position_ratio_bps(
    collateral: Amount,
    debt: Amount,
    collateral_price: Decimal,
    debt_price: Decimal,
) -> Result<Option<Decimal>, BankError> {
    if debt.is_zero() {
        return Ok(None);
    }
    math::collateral_ratio_bps(
        collateral.value(),
        collateral_price,
        debt.value(),
        debt_price,
    )
    .map(Some)
    .ok_or(BankError::ArithmeticOverflow {
        context: "collateralization ratio",
    })
}

/// Does a ratio satisfy the bank's minimum?
pub fn meets_minimum(ratio_bps: Decimal, min_ratio_bps: Decimal) -> bool {
    ratio_bps >= min_ratio_bps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(value: Decimal) -> Amount {
        Amount::new(value).unwrap()
    }

    #[test]
    fn test_no_debt_has_no_ratio() {
        let ratio = position_ratio_bps(amount(dec!(100)), Amount::ZERO, dec!(1), dec!(1)).unwrap();
        assert!(ratio.is_none());
    }

    #[test]
    fn test_ratio_in_bps_of_percent() {
        // 100 collateral at 153.01 vs 100 debt at 100 => 153.01% => 15301
        let ratio = position_ratio_bps(
            amount(dec!(100)),
            amount(dec!(100)),
            dec!(153.01),
            dec!(100),
        )
        .unwrap()
        .unwrap();
        assert_eq!(ratio, dec!(15301));
    }

    #[test]
    fn test_minimum_boundary_is_inclusive() {
        let min = dec!(15000);
        assert!(meets_minimum(dec!(15000), min));
        assert!(meets_minimum(dec!(15001), min));
        assert!(!meets_minimum(dec!(14999), min));
    }

    #[test]
    fn test_price_collapse_drops_ratio() {
        let healthy = position_ratio_bps(amount(dec!(100)), amount(dec!(66.66)), dec!(1), dec!(1))
            .unwrap()
            .unwrap();
        assert!(meets_minimum(healthy, dec!(15000)));

        let crashed =
            position_ratio_bps(amount(dec!(100)), amount(dec!(66.66)), dec!(0.5), dec!(1))
                .unwrap()
                .unwrap();
        assert!(!meets_minimum(crashed, dec!(15000)));
    }
}
