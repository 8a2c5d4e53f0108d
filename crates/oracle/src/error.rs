//! Oracle error types

use thiserror::Error;

/// Oracle-related errors
#[derive(Debug, Error)]
pub enum OracleError {
    /// No price has ever been published for this feed
    #[error("Price feed not found: {feed}")]
    FeedNotFound { feed: String },

    /// Price data is older than the caller's threshold
    #[error("Stale price for {feed}: {age_secs}s old, threshold is {max_age_secs}s")]
    StalePrice {
        feed: String,
        age_secs: i64,
        max_age_secs: u64,
    },

    /// Price data is unusable (zero, negative, malformed mantissa/scale)
    #[error("Invalid price for {feed}: {reason}")]
    InvalidPrice { feed: String, reason: String },

    /// External oracle connection failed
    #[error("Oracle connection failed: {source}")]
    ConnectionFailed {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
