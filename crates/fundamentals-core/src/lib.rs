#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fundamentals/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for the fundamentals data layer.
//!
//! This crate provides the foundational abstractions for financial statement data:
//!
//! - [`Symbol`](types::Symbol) / [`DatasetKind`](types::DatasetKind) - Request and cache identifiers
//! - [`StatementRecord`](records::StatementRecord) - Typed statement rows
//! - [`StatementSource`](source::StatementSource) - Remote data source abstraction
//! - [`StatementStore`](store::StatementStore) - Persistence abstraction
//! - [`FundamentalsError`](error::FundamentalsError) - Error taxonomy

/// Error types for fundamentals operations.
pub mod error;
/// Typed financial statement records.
pub mod records;
/// Source trait for fetching raw statement rows.
pub mod source;
/// Store trait and entry type for persisted statement data.
pub mod store;
/// Core identifier types (Symbol, DatasetKind).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FundamentalsError, Result};
pub use records::{
    BalanceSheet, CashFlowStatement, IncomeStatement, KeyMetrics, Ratios, StatementRecord,
    decode_rows, encode_rows,
};
pub use source::{FetchQuery, StatementSource};
pub use store::{StatementStore, StoredEntry};
pub use types::{DatasetKind, Symbol};
