//! No-op store implementation.

use async_trait::async_trait;
use fundamentals_core::{DatasetKind, Result, StatementStore, StoredEntry, Symbol};
use tracing::trace;

/// A no-op store that never caches anything.
///
/// `get` always returns `Ok(None)` and `put` discards the entry. Useful for
/// disabling caching or exercising the fetch path without cache hits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl NoopStore {
    /// Create a new no-op store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatementStore for NoopStore {
    async fn get(&self, _symbol: &Symbol, _kind: DatasetKind) -> Result<Option<StoredEntry>> {
        trace!("NoopStore: get called, returning None");
        Ok(None)
    }

    async fn put(&self, _symbol: &Symbol, _kind: DatasetKind, _entry: &StoredEntry) -> Result<()> {
        trace!("NoopStore: put called, doing nothing");
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        trace!("NoopStore: purge_expired called, returning 0");
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        trace!("NoopStore: clear called, doing nothing");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn test_noop_store_never_hits() {
        let store = NoopStore::new();
        let symbol = Symbol::new("AAPL");
        let entry = StoredEntry::new(Utc::now(), Duration::days(3), vec![json!({"n": 1})]);

        store
            .put(&symbol, DatasetKind::BalanceSheet, &entry)
            .await
            .unwrap();

        let result = store.get(&symbol, DatasetKind::BalanceSheet).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_noop_store_management() {
        let store = NoopStore::new();
        assert_eq!(store.purge_expired().await.unwrap(), 0);
        assert!(store.clear().await.is_ok());
    }

    #[test]
    fn test_noop_store_is_copy() {
        let store1 = NoopStore::new();
        let store2 = store1;
        let _store3 = store2;
    }
}
