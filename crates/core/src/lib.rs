//! VaultBank Core - Domain types
//!
//! This crate contains the fundamental types used across VaultBank:
//! - `Amount`: Non-negative decimal wrapper for financial amounts
//! - `AssetCode`: Validated asset/currency identifiers
//! - `math`: Basis-point and collateral-ratio arithmetic

pub mod amount;
pub mod asset;
pub mod math;

pub use amount::{Amount, AmountError};
pub use asset::{AssetCode, AssetCodeError};
