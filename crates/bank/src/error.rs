//! Bank engine errors
//!
//! Every check runs before any mutation, so an error means the operation
//! was a no-op apart from the report itself.

use thiserror::Error;
use vaultbank_core::AmountError;
use vaultbank_ledger::TransferError;
use vaultbank_oracle::OracleError;

use crate::config::AssetRole;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Caller {caller} is not the bank owner")]
    NotOwner { caller: String },

    #[error("Insufficient reserve: available {available}, required {required}")]
    InsufficientReserve { available: String, required: String },

    #[error("Insufficient vault collateral: held {held}, requested {requested}")]
    InsufficientVaultCollateral { held: String, requested: String },

    #[error("Withdrawal would undercollateralize the vault: ratio {ratio_bps} bps, minimum {min_bps} bps")]
    Undercollateralized { ratio_bps: String, min_bps: String },

    #[error("Borrow would undercollateralize the vault: ratio {ratio_bps} bps, minimum {min_bps} bps")]
    InsufficientCollateral { ratio_bps: String, min_bps: String },

    #[error("Vault for {borrower} is not undercollateralized")]
    NotUndercollateralized { borrower: String },

    #[error("Asset transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("No {role} asset registered")]
    AssetNotRegistered { role: AssetRole },

    #[error(transparent)]
    InvalidAmount(#[from] AmountError),

    #[error("Arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
