//! Basis-point and collateral-ratio arithmetic
//!
//! All rate math in the bank runs through these helpers. Rates are carried
//! as integer basis points (1 bps = 0.01%), collateralization ratios as
//! basis points of percent (150% == 15_000), and every operation is checked
//! so overflow surfaces as `None` instead of a silently wrong balance.

use rust_decimal::Decimal;

/// Divisor that turns basis points into a fraction (10_000 bps = 100%)
pub const BPS_SCALE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Scale of a collateralization ratio: percent expressed in basis points,
/// so a 150% ratio is reported as 15_000 and 153.01% as 15_301.
pub const RATIO_PRECISION: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Accrual periods per year for annualized interest rates
pub const PERIODS_PER_YEAR: Decimal = Decimal::from_parts(365, 0, 0, false, 0);

/// One hundred, for whole-percent rates
pub const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// `value * bps / 10_000`
pub fn bps_of(value: Decimal, bps: u64) -> Option<Decimal> {
    value
        .checked_mul(Decimal::from(bps))?
        .checked_div(BPS_SCALE)
}

/// `value * pct / 100`
pub fn percent_of(value: Decimal, pct: u64) -> Option<Decimal> {
    value.checked_mul(Decimal::from(pct))?.checked_div(HUNDRED)
}

/// Linear interest for a number of whole accrual periods.
///
/// `principal * rate_bps / 10_000 * periods / 365`, evaluated in exactly
/// that order against the balance as it stood before the accrual, so
/// repeated reads inside one period never drift.
pub fn periodic_interest(principal: Decimal, rate_bps: u64, periods: u64) -> Option<Decimal> {
    bps_of(principal, rate_bps)?
        .checked_mul(Decimal::from(periods))?
        .checked_div(PERIODS_PER_YEAR)
}

/// Collateralization ratio in basis points of percent, truncated to whole
/// basis points.
///
/// `collateral * collateral_price * 10_000 / (debt * debt_price)`
///
/// Returns `None` when the debt value is zero (the caller decides what an
/// undefined ratio means) or on checked-arithmetic failure.
pub fn collateral_ratio_bps(
    collateral: Decimal,
    collateral_price: Decimal,
    debt: Decimal,
    debt_price: Decimal,
) -> Option<Decimal> {
    let collateral_value = collateral.checked_mul(collateral_price)?;
    let debt_value = debt.checked_mul(debt_price)?;
    if debt_value.is_zero() {
        return None;
    }
    collateral_value
        .checked_mul(RATIO_PRECISION)?
        .checked_div(debt_value)
        .map(|r| r.trunc())
}
