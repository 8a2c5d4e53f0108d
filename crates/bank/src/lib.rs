//! VaultBank Engine - vault accounting and risk
//!
//! One administered pool: a reserve funding loans against per-borrower
//! collateral vaults, with time-based interest accrual, origination and
//! liquidation fees, and forced closure of undercollateralized vaults.
//! Prices, asset transfers and time are injected capabilities; every public
//! operation runs as one serialized check-transfer-commit transaction.

pub mod accrual;
pub mod bank;
pub mod clock;
pub mod config;
pub mod error;
pub mod liquidation;
pub mod reserve;
pub mod risk;
pub mod vault;

pub use bank::Bank;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AssetRegistration, AssetRole, BankConfig};
pub use error::BankError;
pub use liquidation::LiquidationOutcome;
pub use reserve::ReserveAccount;
pub use vault::Vault;
