//! Bank configuration and asset registrations

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use vaultbank_core::math::HUNDRED;
use vaultbank_core::AssetCode;

use crate::error::BankError;

/// Which side of the pool an asset registration covers
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    /// The asset borrowers deposit into vaults
    Collateral,
    /// The asset the reserve lends out
    Debt,
}

/// Bank-wide parameters, fixed at initialization.
///
/// Only `interest_rate_bps` and `fee_recipient` can change afterwards, and
/// only through the owner-only setters on [`crate::Bank`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankConfig {
    /// Identity allowed to administer the reserve and the config
    pub owner: String,
    /// Display name; also the bank's own party id on the external ledger
    pub name: String,
    /// Annualized interest rate in basis points
    pub interest_rate_bps: u64,
    /// One-time surcharge added to principal at borrow time, basis points
    pub origination_fee_bps: u64,
    /// Minimum collateral value as a percent of debt value (e.g. 150)
    pub min_collateralization_ratio_pct: u64,
    /// Surcharge applied to owed debt at liquidation, whole percent
    pub liquidation_penalty_pct: u64,
    /// Time quantum over which interest accrues linearly
    pub accrual_period_secs: u64,
    /// Identity receiving protocol fees
    pub fee_recipient: String,
    /// Identity of the oracle this bank was configured against
    pub oracle_address: String,
    /// Reject quotes older than this many seconds; `None` disables the check
    pub max_price_age_secs: Option<u64>,
}

impl BankConfig {
    pub fn validate(&self) -> Result<(), BankError> {
        if self.owner.is_empty() {
            return Err(BankError::InvalidConfig {
                reason: "owner must not be empty".to_string(),
            });
        }
        if self.name.is_empty() {
            return Err(BankError::InvalidConfig {
                reason: "name must not be empty".to_string(),
            });
        }
        if self.fee_recipient.is_empty() {
            return Err(BankError::InvalidConfig {
                reason: "fee_recipient must not be empty".to_string(),
            });
        }
        if self.accrual_period_secs == 0 {
            return Err(BankError::InvalidConfig {
                reason: "accrual_period_secs must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Minimum collateralization ratio in basis points of percent
    /// (150% -> 15_000), the scale risk checks compare against.
    pub fn min_ratio_bps(&self) -> Decimal {
        Decimal::from(self.min_collateralization_ratio_pct) * HUNDRED
    }
}

/// A registered asset: the feed it is priced by and the last price the bank
/// has seen for it.
///
/// `last_known_price` starts at the registered initial price (always > 0)
/// and is refreshed by committed price-dependent operations; it is the
/// documented fallback when the oracle has no quote for the feed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRegistration {
    pub asset: AssetCode,
    pub price_feed: String,
    pub last_known_price: Decimal,
    /// Decimal places the raw feed publishes with
    pub price_scale: u32,
}

impl AssetRegistration {
    pub fn new(
        asset: AssetCode,
        price_feed: impl Into<String>,
        initial_price: Decimal,
        price_scale: u32,
    ) -> Result<Self, BankError> {
        if initial_price <= Decimal::ZERO {
            return Err(BankError::InvalidConfig {
                reason: format!("initial price for {asset} must be positive"),
            });
        }
        Ok(Self {
            asset,
            price_feed: price_feed.into(),
            last_known_price: initial_price,
            price_scale,
        })
    }
}
