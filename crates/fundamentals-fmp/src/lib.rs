#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Financial Modeling Prep (FMP) statement source.
//!
//! This crate implements [`StatementSource`] for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) stable API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fundamentals_fmp::{FmpClient, FmpConfig};
//! use fundamentals_core::{DatasetKind, FetchQuery, StatementSource, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> fundamentals_core::Result<()> {
//!     let client = FmpClient::new(FmpConfig::from_env()?)?;
//!
//!     let symbol = Symbol::new("AAPL");
//!     let query = FetchQuery::new().with_limit(5);
//!     let rows = client
//!         .fetch_rows(&symbol, DatasetKind::BalanceSheet, &query)
//!         .await?;
//!
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use fundamentals_core::{DatasetKind, FetchQuery, FundamentalsError, Result, StatementSource, Symbol};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Base URL for the FMP stable API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com/stable";

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the FMP API key.
pub const ENV_API_KEY: &str = "FMP_API_KEY";

/// Environment variable overriding the FMP base URL.
pub const ENV_BASE_URL: &str = "FMP_BASE_URL";

/// Configuration for the FMP client.
///
/// The API key is required and has no built-in default. Validation happens
/// when the configuration is handed to [`FmpClient::new`].
#[derive(Clone)]
pub struct FmpConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for FmpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FmpConfig {
    /// Creates a configuration with the given API key and default base URL
    /// and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// `FMP_API_KEY` is required; `FMP_BASE_URL` optionally overrides the
    /// default endpoint.
    pub fn from_env() -> Result<Self> {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }

    fn from_env_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(ENV_API_KEY)
            .ok_or_else(|| FundamentalsError::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// Overrides the base URL (useful for tests and proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Financial Modeling Prep statement source.
///
/// Fetches the raw JSON rows for each [`DatasetKind`]; validation into typed
/// records happens in the caller.
#[derive(Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for FmpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmpClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FmpClient {
    /// Creates a new FMP client from the given configuration.
    ///
    /// # Errors
    /// Returns [`FundamentalsError::Config`] if the API key is empty, the
    /// base URL does not parse, or the HTTP client cannot be built.
    pub fn new(config: FmpConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(FundamentalsError::Config(
                "FMP API key must not be empty".to_string(),
            ));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| FundamentalsError::Config(format!("Invalid FMP base URL: {e}")))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FundamentalsError::Config(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key,
            base_url,
        })
    }

    /// Build the request URL for one dataset fetch.
    fn url(&self, symbol: &Symbol, kind: DatasetKind, query: &FetchQuery) -> String {
        let mut url = format!(
            "{}/{}?symbol={}&apikey={}",
            self.base_url,
            kind.as_str(),
            symbol.as_str(),
            self.api_key
        );
        if let Some(limit) = query.limit {
            url.push_str(&format!("&limit={limit}"));
        }
        for (key, value) in &query.extra {
            url.push_str(&format!("&{key}={value}"));
        }
        url
    }

    /// Make a GET request and decode the JSON array response.
    async fn get_rows(&self, url: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FundamentalsError::Source(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FundamentalsError::RateLimited {
                provider: "FMP".to_string(),
                retry_after: None,
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FundamentalsError::Source(format!("HTTP {status}: {text}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FundamentalsError::Source(e.to_string()))?;

        // FMP reports some failures inside a 200 body
        if text.contains("\"Error Message\"") || text.contains("\"error\"") {
            return Err(FundamentalsError::Source(text));
        }

        serde_json::from_str(&text)
            .map_err(|e| FundamentalsError::Source(format!("{e}: {text}")))
    }
}

#[async_trait]
impl StatementSource for FmpClient {
    fn name(&self) -> &str {
        "FMP"
    }

    async fn fetch_rows(
        &self,
        symbol: &Symbol,
        kind: DatasetKind,
        query: &FetchQuery,
    ) -> Result<Vec<Value>> {
        tracing::debug!(%symbol, %kind, limit = ?query.limit, "FMP request");
        let url = self.url(symbol, kind, query);
        let rows = self.get_rows(&url).await?;
        tracing::debug!(%symbol, %kind, count = rows.len(), "FMP response");
        Ok(rows)
    }
}
