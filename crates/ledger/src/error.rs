//! Transfer errors reported by the external ledger

use thiserror::Error;

/// Errors that can occur when moving value between accounts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Insufficient funds in {account} for {asset}: available {available}, required {required}")]
    InsufficientFunds {
        account: String,
        asset: String,
        available: String,
        required: String,
    },

    #[error("Account {account} is not authorized to transfer")]
    Unauthorized { account: String },

    #[error("Transfer rejected: {reason}")]
    Rejected { reason: String },
}
