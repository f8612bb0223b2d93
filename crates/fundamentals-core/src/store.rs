//! Store trait and entry type for persisted statement data.
//!
//! This module defines [`StatementStore`], the persistence abstraction the
//! loader writes through, and [`StoredEntry`], the document stored per
//! `(symbol, dataset)` key.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::types::{DatasetKind, Symbol};

/// A persisted cache document for one `(symbol, dataset)` pair.
///
/// The records array is always written wholesale; a refresh replaces the
/// previous entry rather than merging into it. An empty array is a valid
/// entry and records that the remote source returned no rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// When the entry was last refreshed from the remote source.
    pub updated_at: DateTime<Utc>,
    /// Advisory expiry as Unix epoch seconds, consumed by
    /// [`StatementStore::purge_expired`].
    pub expires_at: i64,
    /// The validated rows, serialized as plain JSON objects.
    pub records: Vec<Value>,
}

impl StoredEntry {
    /// Creates an entry stamped with the given refresh time and time-to-live.
    #[must_use]
    pub fn new(updated_at: DateTime<Utc>, ttl: Duration, records: Vec<Value>) -> Self {
        Self {
            updated_at,
            expires_at: (updated_at + ttl).timestamp(),
            records,
        }
    }

    /// Returns the age of this entry relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.updated_at)
    }
}

/// Persistence for statement cache entries.
///
/// A missing entry is `Ok(None)` from [`get`](Self::get); every other store
/// failure surfaces as
/// [`FundamentalsError::Store`](crate::FundamentalsError::Store) and is never
/// silently treated as a miss.
#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Retrieves the cache entry for a symbol and dataset kind.
    async fn get(&self, symbol: &Symbol, kind: DatasetKind) -> Result<Option<StoredEntry>>;

    /// Stores a cache entry, atomically replacing any previous entry for the key.
    async fn put(&self, symbol: &Symbol, kind: DatasetKind, entry: &StoredEntry) -> Result<()>;

    /// Removes entries whose advisory expiry has passed.
    ///
    /// Returns the number of entries removed.
    async fn purge_expired(&self) -> Result<usize>;

    /// Clears all cached entries.
    async fn clear(&self) -> Result<()>;
}
