//! Interest accrual
//!
//! Brings a vault's debt current before any decision is made about it.
//! Interest is linear in elapsed whole periods and computed once against
//! the balance as it stood before the call; fractional periods roll into
//! the next accrual. Accrual moves no external value.

use chrono::{DateTime, Duration, Utc};
use vaultbank_core::math;
use vaultbank_core::Amount;

use crate::error::BankError;
use crate::vault::Vault;

/// Accrue interest on `vault` up to `now`.
///
/// Returns the number of whole periods applied (0 is a no-op). The caller
/// owns the vault copy and decides whether the accrual commits.
pub fn accrue(
    vault: &mut Vault,
    interest_rate_bps: u64,
    accrual_period_secs: u64,
    now: DateTime<Utc>,
) -> Result<u64, BankError> {
    let elapsed_secs = now.signed_duration_since(vault.last_accrual).num_seconds();
    if elapsed_secs <= 0 {
        return Ok(0);
    }

    let periods = elapsed_secs as u64 / accrual_period_secs;
    if periods == 0 {
        return Ok(0);
    }

    let interest = math::periodic_interest(vault.debt.value(), interest_rate_bps, periods)
        .ok_or(BankError::ArithmeticOverflow {
            context: "interest accrual",
        })?;

    vault.debt = vault
        .debt
        .checked_add(Amount::new_unchecked(interest))
        .ok_or(BankError::ArithmeticOverflow {
            context: "debt balance",
        })?;

    // Advance only by the whole periods consumed, never past `now`, so the
    // fractional remainder counts toward the next accrual.
    let advanced_secs = periods
        .checked_mul(accrual_period_secs)
        .and_then(|s| i64::try_from(s).ok())
        .ok_or(BankError::ArithmeticOverflow {
            context: "accrual timestamp",
        })?;
    vault.last_accrual += Duration::seconds(advanced_secs);

    Ok(periods)
}
