//! AssetCode - Validated asset/currency identifiers
//!
//! The bank registers exactly two assets (collateral and debt), identified
//! by short uppercase codes such as "SOL" or "USDC". Codes are normalized
//! and validated on construction so they can be used as map keys and ledger
//! party-facing identifiers without further checks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur when parsing asset codes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetCodeError {
    #[error("Empty asset code")]
    Empty,

    #[error("Asset code too long (max 10 chars): {0}")]
    TooLong(String),

    #[error("Invalid asset code format: {0}")]
    InvalidFormat(String),
}

/// A normalized asset identifier.
///
/// Uppercase, 1-10 ASCII alphanumeric characters.
///
/// # Examples
/// ```
/// use vaultbank_core::AssetCode;
///
/// let usdc: AssetCode = "usdc".parse().unwrap();
/// assert_eq!(usdc.as_str(), "USDC");
///
/// assert!("BTC-USD".parse::<AssetCode>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetCode(String);

impl AssetCode {
    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetCode {
    type Err = AssetCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();

        if s.is_empty() {
            return Err(AssetCodeError::Empty);
        }

        if s.len() > 10 {
            return Err(AssetCodeError::TooLong(s));
        }

        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AssetCodeError::InvalidFormat(s));
        }

        Ok(Self(s))
    }
}

impl TryFrom<String> for AssetCode {
    type Error = AssetCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AssetCode> for String {
    fn from(code: AssetCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let code: AssetCode = "usdc".parse().unwrap();
        assert_eq!(code.as_str(), "USDC");
        assert_eq!(code.to_string(), "USDC");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let code: AssetCode = " SOL ".parse().unwrap();
        assert_eq!(code.as_str(), "SOL");
    }

    #[test]
    fn test_empty_code_error() {
        let result: Result<AssetCode, _> = "".parse();
        assert!(matches!(result, Err(AssetCodeError::Empty)));
    }

    #[test]
    fn test_too_long_error() {
        let result: Result<AssetCode, _> = "VERYLONGASSETNAME".parse();
        assert!(matches!(result, Err(AssetCodeError::TooLong(_))));
    }

    #[test]
    fn test_invalid_format_error() {
        let result: Result<AssetCode, _> = "BTC-USD".parse();
        assert!(matches!(result, Err(AssetCodeError::InvalidFormat(_))));
    }

    #[test]
    fn test_serde_roundtrip() {
        let code: AssetCode = "SOL".parse().unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"SOL\"");
        let parsed: AssetCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, parsed);
    }
}
