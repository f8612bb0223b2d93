//! Error types for fundamentals operations.
//!
//! This module defines [`FundamentalsError`] which covers the failure classes
//! that can occur when fetching, persisting, or configuring statement data.
//!
//! Row-level validation failures are deliberately not represented here: a row
//! that fails validation is skipped and logged, never surfaced as an error.

use thiserror::Error;

/// Errors that can occur during fundamentals data operations.
#[derive(Error, Debug)]
pub enum FundamentalsError {
    /// Remote source failures (connection errors, timeouts, bad responses).
    #[error("Source error: {0}")]
    Source(String),

    /// Rate limit exceeded at the remote source.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// Error reading from or writing to the statement store.
    ///
    /// A store miss is not an error; it is `Ok(None)` from
    /// [`StatementStore::get`](crate::store::StatementStore::get).
    #[error("Store error: {0}")]
    Store(String),

    /// Invalid configuration (missing API key, malformed base URL, bad parameters).
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using [`FundamentalsError`].
pub type Result<T> = std::result::Result<T, FundamentalsError>;
