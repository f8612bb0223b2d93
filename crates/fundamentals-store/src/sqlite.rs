//! SQLite-backed store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fundamentals_core::{
    DatasetKind, FundamentalsError, Result, StatementStore, StoredEntry, Symbol,
};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, instrument};

/// SQLite-backed store for statement cache entries.
///
/// One row per `(symbol, dataset)` key; a write replaces the whole row in a
/// single statement, so readers never observe a partially updated entry.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SQLite store at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| FundamentalsError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Create an in-memory SQLite store.
    ///
    /// Useful for testing; data is lost when the store is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| FundamentalsError::Store(e.to_string()))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS statement_cache (
                symbol TEXT NOT NULL,
                dataset TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                expires_at INTEGER NOT NULL,
                records_json TEXT NOT NULL,
                PRIMARY KEY (symbol, dataset)
            )",
            [],
        )
        .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        debug!("SQLite statement store schema initialized");
        Ok(())
    }
}

#[async_trait]
impl StatementStore for SqliteStore {
    #[instrument(skip(self), fields(symbol = %symbol, dataset = %kind))]
    async fn get(&self, symbol: &Symbol, kind: DatasetKind) -> Result<Option<StoredEntry>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        let row = conn
            .query_row(
                "SELECT updated_at, expires_at, records_json FROM statement_cache
                 WHERE symbol = ?1 AND dataset = ?2",
                params![symbol.as_str(), kind.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        match row {
            Some((updated_at, expires_at, records_json)) => {
                let updated_at = DateTime::parse_from_rfc3339(&updated_at)
                    .map_err(|e| {
                        FundamentalsError::Store(format!("Invalid updated_at timestamp: {e}"))
                    })?
                    .with_timezone(&Utc);
                let records: Vec<Value> = serde_json::from_str(&records_json)
                    .map_err(|e| FundamentalsError::Store(e.to_string()))?;

                debug!(count = records.len(), "Found cached entry");
                Ok(Some(StoredEntry {
                    updated_at,
                    expires_at,
                    records,
                }))
            }
            None => {
                debug!("No cached entry found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, entry), fields(symbol = %symbol, dataset = %kind, count = entry.records.len()))]
    async fn put(&self, symbol: &Symbol, kind: DatasetKind, entry: &StoredEntry) -> Result<()> {
        let records_json = serde_json::to_string(&entry.records)
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        conn.execute(
            "INSERT OR REPLACE INTO statement_cache
             (symbol, dataset, updated_at, expires_at, records_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                symbol.as_str(),
                kind.as_str(),
                entry.updated_at.to_rfc3339(),
                entry.expires_at,
                records_json
            ],
        )
        .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        debug!("Cached entry");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now().timestamp();

        let conn = self
            .conn
            .lock()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        let deleted = conn
            .execute(
                "DELETE FROM statement_cache WHERE expires_at < ?1",
                params![now],
            )
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        if deleted > 0 {
            debug!("Purged {} expired entries", deleted);
        }

        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        conn.execute("DELETE FROM statement_cache", [])
            .map_err(|e| FundamentalsError::Store(e.to_string()))?;

        debug!("Cleared all entries");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn entry_with(age: Duration, ttl: Duration, records: Vec<Value>) -> StoredEntry {
        StoredEntry::new(Utc::now() - age, ttl, records)
    }

    #[tokio::test]
    async fn test_sqlite_store_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok());
    }

    #[tokio::test]
    async fn test_get_and_put_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        // Initially a miss
        let result = store.get(&symbol, DatasetKind::BalanceSheet).await.unwrap();
        assert!(result.is_none());

        let entry = entry_with(
            Duration::zero(),
            Duration::days(3),
            vec![json!({"date": "2024-09-28", "symbol": "AAPL"})],
        );
        store
            .put(&symbol, DatasetKind::BalanceSheet, &entry)
            .await
            .unwrap();

        let retrieved = store
            .get(&symbol, DatasetKind::BalanceSheet)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.records, entry.records);
        assert_eq!(retrieved.expires_at, entry.expires_at);
        // RFC 3339 text keeps sub-second precision
        assert_eq!(retrieved.updated_at, entry.updated_at);
    }

    #[tokio::test]
    async fn test_keys_are_case_sensitive_and_partitioned() {
        let store = SqliteStore::in_memory().unwrap();
        let entry = entry_with(Duration::zero(), Duration::days(3), vec![json!({"n": 1})]);

        store
            .put(&Symbol::new("AAPL"), DatasetKind::Ratios, &entry)
            .await
            .unwrap();

        // Different casing and different dataset are both misses
        assert!(
            store
                .get(&Symbol::new("aapl"), DatasetKind::Ratios)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .get(&Symbol::new("AAPL"), DatasetKind::KeyMetrics)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_put_replaces_previous_entry() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("AAPL");

        let first = entry_with(
            Duration::days(2),
            Duration::days(3),
            vec![json!({"n": 1}), json!({"n": 2}), json!({"n": 3})],
        );
        store
            .put(&symbol, DatasetKind::IncomeStatement, &first)
            .await
            .unwrap();

        let second = entry_with(Duration::zero(), Duration::days(3), vec![json!({"n": 9})]);
        store
            .put(&symbol, DatasetKind::IncomeStatement, &second)
            .await
            .unwrap();

        let retrieved = store
            .get(&symbol, DatasetKind::IncomeStatement)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(retrieved.records, vec![json!({"n": 9})]);
        assert_eq!(retrieved.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_empty_records_entry_is_stored() {
        let store = SqliteStore::in_memory().unwrap();
        let symbol = Symbol::new("NEWCO");

        let entry = entry_with(Duration::zero(), Duration::days(3), Vec::new());
        store
            .put(&symbol, DatasetKind::CashFlow, &entry)
            .await
            .unwrap();

        let retrieved = store
            .get(&symbol, DatasetKind::CashFlow)
            .await
            .unwrap()
            .unwrap();
        assert!(retrieved.records.is_empty());
    }

    #[tokio::test]
    async fn test_purge_expired_reaps_only_past_expiry() {
        let store = SqliteStore::in_memory().unwrap();

        let expired = entry_with(Duration::days(10), Duration::days(3), vec![json!({"n": 1})]);
        let live = entry_with(Duration::hours(1), Duration::days(3), vec![json!({"n": 2})]);

        store
            .put(&Symbol::new("OLD"), DatasetKind::BalanceSheet, &expired)
            .await
            .unwrap();
        store
            .put(&Symbol::new("NEW"), DatasetKind::BalanceSheet, &live)
            .await
            .unwrap();

        let purged = store.purge_expired().await.unwrap();
        assert_eq!(purged, 1);

        assert!(
            store
                .get(&Symbol::new("OLD"), DatasetKind::BalanceSheet)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .get(&Symbol::new("NEW"), DatasetKind::BalanceSheet)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_clear_store() {
        let store = SqliteStore::in_memory().unwrap();
        let entry = entry_with(Duration::zero(), Duration::days(3), vec![json!({"n": 1})]);

        store
            .put(&Symbol::new("AAPL"), DatasetKind::KeyMetrics, &entry)
            .await
            .unwrap();
        store.clear().await.unwrap();

        let result = store
            .get(&Symbol::new("AAPL"), DatasetKind::KeyMetrics)
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
