//! Mock Oracle for testing
//!
//! Provides configurable fixed prices so collateral valuation can be tested
//! deterministically, including the unknown-feed and stale-quote paths.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::OracleError;
use crate::types::{PriceOracle, PriceQuote};

/// Mock Price Oracle for testing
///
/// Stores fixed quotes that can be updated programmatically.
pub struct MockOracle {
    /// Stored quotes (feed -> quote)
    quotes: RwLock<HashMap<String, PriceQuote>>,
}

impl MockOracle {
    /// Create a new empty mock oracle
    pub fn new() -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
        }
    }

    /// Set a fixed price for a feed, timestamped now
    pub fn set_price(&self, feed: impl Into<String>, price: Decimal) {
        let feed = feed.into();
        let quote = PriceQuote::from_decimal(feed.clone(), price, Utc::now(), "mock");
        let mut quotes = self.quotes.write().unwrap();
        quotes.insert(feed, quote);
    }

    /// Store a fully specified quote (for staleness and scale tests)
    pub fn set_quote(&self, quote: PriceQuote) {
        let mut quotes = self.quotes.write().unwrap();
        quotes.insert(quote.feed.clone(), quote);
    }

    /// Remove a feed (for testing the feed-not-found path)
    pub fn remove_price(&self, feed: &str) {
        let mut quotes = self.quotes.write().unwrap();
        quotes.remove(feed);
    }

    /// Number of configured feeds
    pub fn feed_count(&self) -> usize {
        self.quotes.read().unwrap().len()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceOracle for MockOracle {
    async fn price(&self, feed: &str) -> Result<PriceQuote, OracleError> {
        let quotes = self.quotes.read().unwrap();
        quotes
            .get(feed)
            .cloned()
            .ok_or_else(|| OracleError::FeedNotFound {
                feed: feed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mock_oracle_set_price() {
        let oracle = MockOracle::new();

        assert!(oracle.price("SOL/USD").await.is_err());

        oracle.set_price("SOL/USD", dec!(153.01));

        let quote = oracle.price("SOL/USD").await.unwrap();
        assert_eq!(quote.normalized(), dec!(153.01));
        assert_eq!(quote.source, "mock");
    }

    #[tokio::test]
    async fn test_mock_oracle_feed_not_found() {
        let oracle = MockOracle::new();

        let result = oracle.price("UNKNOWN/USD").await;
        assert!(matches!(result, Err(OracleError::FeedNotFound { .. })));
    }

    #[tokio::test]
    async fn test_mock_oracle_overwrite_price() {
        let oracle = MockOracle::new();

        oracle.set_price("USDC/USD", dec!(1));
        oracle.set_price("USDC/USD", dec!(0.99));

        let quote = oracle.price("USDC/USD").await.unwrap();
        assert_eq!(quote.normalized(), dec!(0.99));
        assert_eq!(oracle.feed_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_oracle_remove_price() {
        let oracle = MockOracle::new();

        oracle.set_price("SOL/USD", dec!(100));
        oracle.remove_price("SOL/USD");

        assert!(oracle.price("SOL/USD").await.is_err());
        assert_eq!(oracle.feed_count(), 0);
    }
}
