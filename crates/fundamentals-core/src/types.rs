//! Core identifier types for statement data.
//!
//! This module defines the two identifiers that address a cache entry:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`DatasetKind`] - The statement dataset families served by the data layer

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FundamentalsError;

/// A trading symbol/ticker.
///
/// The symbol is stored exactly as given; callers own the canonical casing.
/// `"AAPL"` and `"aapl"` address different cache entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// The statement dataset families served by the data layer.
///
/// The canonical string form returned by [`DatasetKind::as_str`] doubles as
/// the remote resource path and the cache partition for the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    /// Balance sheet statements.
    BalanceSheet,
    /// Income statements.
    IncomeStatement,
    /// Cash flow statements.
    CashFlow,
    /// Key financial metrics.
    KeyMetrics,
    /// Financial ratios.
    Ratios,
}

impl DatasetKind {
    /// All dataset kinds, in presentation order.
    pub const ALL: [Self; 5] = [
        Self::BalanceSheet,
        Self::IncomeStatement,
        Self::CashFlow,
        Self::KeyMetrics,
        Self::Ratios,
    ];

    /// Returns the canonical string form of this dataset kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet-statement",
            Self::IncomeStatement => "income-statement",
            Self::CashFlow => "cash-flow-statement",
            Self::KeyMetrics => "key-metrics",
            Self::Ratios => "ratios",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = FundamentalsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balance-sheet-statement" => Ok(Self::BalanceSheet),
            "income-statement" => Ok(Self::IncomeStatement),
            "cash-flow-statement" => Ok(Self::CashFlow),
            "key-metrics" => Ok(Self::KeyMetrics),
            "ratios" => Ok(Self::Ratios),
            _ => Err(FundamentalsError::Config(format!(
                "Unknown dataset kind: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_preserves_case() {
        assert_eq!(Symbol::new("aapl").as_str(), "aapl");
        assert_eq!(Symbol::new("AAPL").as_str(), "AAPL");
        assert_ne!(Symbol::new("aapl"), Symbol::new("AAPL"));
    }

    #[test]
    fn test_dataset_kind_round_trip() {
        for kind in DatasetKind::ALL {
            assert_eq!(kind.as_str().parse::<DatasetKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_dataset_kind_rejects_unknown() {
        assert!("quote".parse::<DatasetKind>().is_err());
    }
}
