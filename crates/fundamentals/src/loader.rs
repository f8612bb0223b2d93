//! The read-through cache loader.

use std::sync::Arc;

use chrono::{Duration, Utc};
use fundamentals_core::{
    FetchQuery, Result, StatementRecord, StatementSource, StatementStore, StoredEntry, Symbol,
    decode_rows, encode_rows,
};
use tracing::debug;

/// Default freshness window for the read path.
const DEFAULT_MAX_CACHE_AGE_HOURS: i64 = 24;

/// Default time-to-live stamped on the write path.
const DEFAULT_TTL_DAYS: i64 = 3;

/// Per-call options for [`StatementLoader::load`].
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Cap on the number of most-recent periods requested from the remote
    /// source. Forwarded as a query parameter; never truncates a cache hit.
    pub limit: Option<usize>,
    /// Additional remote query parameters, opaque to the loader.
    pub extra_params: Vec<(String, String)>,
    /// Time-to-live in days stamped on the entry written by this call.
    /// Falls back to the loader's default when unset.
    pub ttl_days: Option<i64>,
}

impl LoadOptions {
    /// Creates options with every field at its default.
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

    /// Appends an extra remote query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.push((key.into(), value.into()));
        self
    }

    /// Sets the time-to-live stamped on the entry written by this call.
    #[must_use]
    pub fn with_ttl_days(mut self, days: i64) -> Self {
        self.ttl_days = Some(days);
        self
    }
}

/// Read-through cache loader for financial statement datasets.
///
/// For each `(symbol, dataset)` pair the loader serves the persisted cache
/// entry when it is younger than the freshness window, and otherwise fetches
/// from the remote source, replaces the entry wholesale, and returns the
/// fresh records. The loader holds no per-call state; everything it knows
/// between calls lives in the store.
///
/// The freshness window (read path, hours) and the time-to-live (write path,
/// days) are independent knobs. The former decides whether a stored entry
/// may be served without a remote call; the latter is an advisory expiry
/// consumed by store-level housekeeping
/// ([`StatementStore::purge_expired`]).
///
/// Two callers racing a miss on the same key may both fetch and both write;
/// the last writer wins. Keys are disjoint partitions, so concurrent loads
/// of different `(symbol, dataset)` pairs never interfere.
#[derive(Clone)]
pub struct StatementLoader {
    source: Arc<dyn StatementSource>,
    store: Arc<dyn StatementStore>,
    max_cache_age: Duration,
    default_ttl: Duration,
}

impl std::fmt::Debug for StatementLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementLoader")
            .field("source", &self.source.name())
            .field("max_cache_age", &self.max_cache_age)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

impl StatementLoader {
    /// Creates a loader with the default freshness window (24 hours) and
    /// default time-to-live (3 days).
    #[must_use]
    pub fn new(source: Arc<dyn StatementSource>, store: Arc<dyn StatementStore>) -> Self {
        Self {
            source,
            store,
            max_cache_age: Duration::hours(DEFAULT_MAX_CACHE_AGE_HOURS),
            default_ttl: Duration::days(DEFAULT_TTL_DAYS),
        }
    }

    /// Overrides the freshness window used on the read path.
    #[must_use]
    pub fn with_max_cache_age(mut self, max_cache_age: Duration) -> Self {
        self.max_cache_age = max_cache_age;
        self
    }

    /// Overrides the default time-to-live stamped on the write path.
    #[must_use]
    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }

    /// Loads the records of kind `R` for one symbol.
    ///
    /// Serves the stored entry when it is fresher than the loader's
    /// freshness window; otherwise fetches from the remote source, replaces
    /// the entry wholesale and returns the fresh rows. Rows that fail
    /// validation are skipped and logged on both paths. A successful fetch
    /// with zero valid rows still writes an (empty) entry, so symbols with
    /// genuinely no data are not refetched on every call.
    ///
    /// # Errors
    /// Remote failures surface as
    /// [`Source`](fundamentals_core::FundamentalsError::Source) or
    /// [`RateLimited`](fundamentals_core::FundamentalsError::RateLimited)
    /// and leave the store untouched. Store failures other than a plain
    /// miss surface as
    /// [`Store`](fundamentals_core::FundamentalsError::Store).
    pub async fn load<R: StatementRecord>(
        &self,
        symbol: &Symbol,
        options: &LoadOptions,
    ) -> Result<Vec<R>> {
        let now = Utc::now();

        if let Some(entry) = self.store.get(symbol, R::KIND).await? {
            if entry.age(now) < self.max_cache_age {
                debug!(
                    %symbol,
                    kind = %R::KIND,
                    count = entry.records.len(),
                    "Cache hit"
                );
                return Ok(decode_rows(&entry.records));
            }
            debug!(%symbol, kind = %R::KIND, age = %entry.age(now), "Cache entry stale");
        } else {
            debug!(%symbol, kind = %R::KIND, "Cache miss");
        }

        let query = FetchQuery {
            limit: options.limit,
            extra: options.extra_params.clone(),
        };
        let rows = self.source.fetch_rows(symbol, R::KIND, &query).await?;

        let records: Vec<R> = decode_rows(&rows);

        let ttl = options
            .ttl_days
            .map_or(self.default_ttl, Duration::days);
        let entry = StoredEntry::new(now, ttl, encode_rows(&records)?);
        self.store.put(symbol, R::KIND, &entry).await?;

        debug!(
            %symbol,
            kind = %R::KIND,
            fetched = rows.len(),
            valid = records.len(),
            "Refreshed cache entry"
        );
        Ok(records)
    }
}
