//! In-memory store implementation.

use async_trait::async_trait;
use chrono::Utc;
use fundamentals_core::{DatasetKind, Result, StatementStore, StoredEntry, Symbol};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Key for statement cache entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StoreKey {
    symbol: String,
    kind: DatasetKind,
}

impl StoreKey {
    fn new(symbol: &Symbol, kind: DatasetKind) -> Self {
        Self {
            symbol: symbol.as_str().to_string(),
            kind,
        }
    }
}

/// Simple in-memory store for testing and development.
///
/// Entries are stored in a `RwLock`-protected `HashMap` and are lost when the
/// store is dropped. Entries are cloned on get/put operations.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<StoreKey, StoredEntry>>,
}

impl InMemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatementStore for InMemoryStore {
    #[instrument(skip(self), fields(symbol = %symbol, dataset = %kind))]
    async fn get(&self, symbol: &Symbol, kind: DatasetKind) -> Result<Option<StoredEntry>> {
        let entries = self.entries.read().await;
        match entries.get(&StoreKey::new(symbol, kind)) {
            Some(entry) => {
                debug!(count = entry.records.len(), "Found cached entry");
                Ok(Some(entry.clone()))
            }
            None => {
                debug!("No cached entry found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, entry), fields(symbol = %symbol, dataset = %kind, count = entry.records.len()))]
    async fn put(&self, symbol: &Symbol, kind: DatasetKind, entry: &StoredEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(StoreKey::new(symbol, kind), entry.clone());
        debug!("Cached entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now().timestamp();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= now);
        let removed = before - entries.len();

        if removed > 0 {
            debug!("Purged {} expired entries", removed);
        }

        Ok(removed)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        debug!("Cleared all entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = InMemoryStore::new();
        let symbol = Symbol::new("AAPL");

        let result = store.get(&symbol, DatasetKind::KeyMetrics).await.unwrap();
        assert!(result.is_none());

        let entry = StoredEntry::new(
            Utc::now(),
            Duration::days(3),
            vec![json!({"symbol": "AAPL", "date": "2024-09-28"})],
        );
        store
            .put(&symbol, DatasetKind::KeyMetrics, &entry)
            .await
            .unwrap();

        let retrieved = store
            .get(&symbol, DatasetKind::KeyMetrics)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved, entry);
    }

    #[tokio::test]
    async fn test_memory_store_purge_expired() {
        let store = InMemoryStore::new();

        let expired = StoredEntry::new(
            Utc::now() - Duration::days(10),
            Duration::days(3),
            vec![json!({"n": 1})],
        );
        let live = StoredEntry::new(Utc::now(), Duration::days(3), vec![json!({"n": 2})]);

        store
            .put(&Symbol::new("OLD"), DatasetKind::Ratios, &expired)
            .await
            .unwrap();
        store
            .put(&Symbol::new("NEW"), DatasetKind::Ratios, &live)
            .await
            .unwrap();

        let removed = store.purge_expired().await.unwrap();
        assert_eq!(removed, 1);
        assert!(
            store
                .get(&Symbol::new("NEW"), DatasetKind::Ratios)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_memory_store_clear() {
        let store = InMemoryStore::new();
        let entry = StoredEntry::new(Utc::now(), Duration::days(3), Vec::new());

        store
            .put(&Symbol::new("AAPL"), DatasetKind::CashFlow, &entry)
            .await
            .unwrap();
        store.clear().await.unwrap();

        let result = store.get(&Symbol::new("AAPL"), DatasetKind::CashFlow).await.unwrap();
        assert!(result.is_none());
    }
}
