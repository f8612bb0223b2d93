//! Source trait for fetching raw statement rows.
//!
//! This module defines [`StatementSource`], the abstraction over the remote
//! data vendor, and [`FetchQuery`], the per-request parameters forwarded to it.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::error::Result;
use crate::types::{DatasetKind, Symbol};

/// Query parameters for one remote statement fetch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchQuery {
    /// Maximum number of rows to request from the remote source.
    pub limit: Option<usize>,
    /// Additional query parameters appended to the request.
    pub extra: Vec<(String, String)>,
}

impl FetchQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row limit for the remote request.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Appends an extra query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

/// Remote source of raw statement rows.
///
/// Implementations fetch one dataset for one symbol per call and return the
/// decoded JSON array untouched; row validation happens downstream so that a
/// single malformed row cannot fail the batch.
#[async_trait]
pub trait StatementSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g. "FMP").
    fn name(&self) -> &str;

    /// Fetches the raw rows for one symbol and dataset kind.
    ///
    /// All remote failures (connection errors, timeouts, non-success status
    /// codes, undecodable bodies) surface as
    /// [`FundamentalsError::Source`](crate::FundamentalsError::Source) or
    /// [`FundamentalsError::RateLimited`](crate::FundamentalsError::RateLimited).
    async fn fetch_rows(
        &self,
        symbol: &Symbol,
        kind: DatasetKind,
        query: &FetchQuery,
    ) -> Result<Vec<Value>>;
}
