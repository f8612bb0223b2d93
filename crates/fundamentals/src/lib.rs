#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Read-through cached financial statement loading.
//!
//! The central type is [`StatementLoader`]: per `(symbol, dataset)` pair it
//! serves the persisted cache entry when fresh and otherwise refreshes it
//! from the remote source. On top of it sit batch loading
//! ([`StatementLoader::load_bundle`]), fiscal-year metric derivation
//! ([`derive_metrics`]), billions formatting ([`format_billions`]) and the
//! [`DashboardState`] session context.
//!
//! # Features
//!
//! - `fmp` - Financial Modeling Prep statement source
//! - `store-sqlite` - SQLite-backed persistent store
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fundamentals::{FmpClient, FmpConfig, SqliteStore, StatementLoader, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> fundamentals::Result<()> {
//!     let source = Arc::new(FmpClient::new(FmpConfig::from_env()?)?);
//!     let store = Arc::new(SqliteStore::new("statements.db")?);
//!     let loader = StatementLoader::new(source, store);
//!
//!     let bundle = loader.load_bundle(&Symbol::new("AAPL"), Some(5)).await?;
//!     println!("{} balance sheet periods", bundle.balance_sheets.len());
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use fundamentals_core::*;

// Store implementations
#[cfg(feature = "store-sqlite")]
pub use fundamentals_store::SqliteStore;
pub use fundamentals_store::{InMemoryStore, NoopStore};

// Sources
#[cfg(feature = "fmp")]
pub use fundamentals_fmp::{FmpClient, FmpConfig};

mod bundle;
mod format;
mod loader;
mod metrics;
mod session;

pub use bundle::StatementBundle;
pub use format::format_billions;
pub use loader::{LoadOptions, StatementLoader};
pub use metrics::{FiscalYearMetrics, derive_metrics};
pub use session::DashboardState;
