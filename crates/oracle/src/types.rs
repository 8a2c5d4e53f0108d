//! Core oracle types

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::OracleError;

/// The latest known price for a feed.
///
/// Prices travel as an integer mantissa plus a decimal scale, the way raw
/// feeds publish them; `normalized()` yields the exact `Decimal` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Feed identifier (e.g. "SOL/USD")
    pub feed: String,
    /// Price mantissa
    pub value: i128,
    /// Number of decimal places in `value`
    pub scale: u32,
    /// When the source last updated this price
    pub published_at: DateTime<Utc>,
    /// Where the price came from (e.g. "mock", "pyth")
    pub source: String,
}

impl PriceQuote {
    /// Create a quote from raw mantissa/scale parts.
    ///
    /// Fails if the parts do not represent a valid decimal number.
    pub fn new(
        feed: impl Into<String>,
        value: i128,
        scale: u32,
        published_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Result<Self, OracleError> {
        let feed = feed.into();
        Decimal::try_from_i128_with_scale(value, scale).map_err(|e| OracleError::InvalidPrice {
            feed: feed.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            feed,
            value,
            scale,
            published_at,
            source: source.into(),
        })
    }

    /// Create a quote directly from a `Decimal` price
    pub fn from_decimal(
        feed: impl Into<String>,
        price: Decimal,
        published_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            feed: feed.into(),
            value: price.mantissa(),
            scale: price.scale(),
            published_at,
            source: source.into(),
        }
    }

    /// The exact decimal price
    pub fn normalized(&self) -> Decimal {
        // Valid by construction: both constructors go through Decimal
        Decimal::from_i128_with_scale(self.value, self.scale)
    }

    /// Quote age in seconds relative to `now` (negative if from the future)
    pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.published_at).num_seconds()
    }

    /// Check if the quote is older than `max_age_secs` at `now`
    pub fn is_stale(&self, max_age_secs: u64, now: DateTime<Utc>) -> bool {
        self.age_secs(now) > max_age_secs as i64
    }
}

/// Price Oracle trait - interface to the external price source
///
/// Implementations can be:
/// - `MockOracle`: fixed prices for tests
/// - adapters over real feeds (Pyth, Chainlink, an internal service)
///
/// The bank treats this as read-only: one feed in, latest quote out.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Get the latest known price for a feed
    async fn price(&self, feed: &str) -> Result<PriceQuote, OracleError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_normalized() {
        let quote = PriceQuote::new("SOL/USD", 15_301, 2, Utc::now(), "test").unwrap();
        assert_eq!(quote.normalized(), dec!(153.01));
    }

    #[test]
    fn test_quote_from_decimal_roundtrip() {
        let quote = PriceQuote::from_decimal("SOL/USD", dec!(153.01), Utc::now(), "test");
        assert_eq!(quote.normalized(), dec!(153.01));
        assert_eq!(quote.scale, 2);
    }

    #[test]
    fn test_quote_invalid_scale_rejected() {
        let result = PriceQuote::new("SOL/USD", 1, 40, Utc::now(), "test");
        assert!(matches!(result, Err(OracleError::InvalidPrice { .. })));
    }

    #[test]
    fn test_staleness() {
        let published = Utc::now();
        let quote = PriceQuote::from_decimal("SOL/USD", dec!(100), published, "test");

        let fresh = published + Duration::seconds(30);
        assert!(!quote.is_stale(60, fresh));

        let old = published + Duration::seconds(61);
        assert!(quote.is_stale(60, old));
    }
}
