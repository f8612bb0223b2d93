//! Explicit session context for dashboard callers.

use fundamentals_core::{
    BalanceSheet, CashFlowStatement, IncomeStatement, KeyMetrics, Ratios, Symbol,
};

use crate::bundle::StatementBundle;
use crate::metrics::{FiscalYearMetrics, derive_metrics};

/// The current-view state a dashboard carries between interactions: the
/// selected symbol, its last-loaded statement tables and the derived metric
/// rows.
///
/// This is an explicit, passed-around context owned by the caller's
/// composition root; it is distinct from the persisted cross-session cache
/// behind [`StatementLoader`](crate::StatementLoader).
#[derive(Clone, Debug, Default)]
pub struct DashboardState {
    symbol: Option<Symbol>,
    bundle: StatementBundle,
    metrics: Vec<FiscalYearMetrics>,
}

impl DashboardState {
    /// Creates an empty state with no symbol selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected symbol, if any.
    #[must_use]
    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    /// Replaces the current view with a freshly loaded bundle and derives
    /// its metric rows.
    pub fn replace(&mut self, symbol: Symbol, bundle: StatementBundle) {
        self.metrics = derive_metrics(&bundle);
        self.bundle = bundle;
        self.symbol = Some(symbol);
    }

    /// Balance sheet periods of the current view, newest first.
    #[must_use]
    pub fn balance_sheets(&self) -> &[BalanceSheet] {
        &self.bundle.balance_sheets
    }

    /// Income statement periods of the current view, newest first.
    #[must_use]
    pub fn income_statements(&self) -> &[IncomeStatement] {
        &self.bundle.income_statements
    }

    /// Cash flow statement periods of the current view, newest first.
    #[must_use]
    pub fn cash_flows(&self) -> &[CashFlowStatement] {
        &self.bundle.cash_flows
    }

    /// Key metrics periods of the current view, newest first.
    #[must_use]
    pub fn key_metrics(&self) -> &[KeyMetrics] {
        &self.bundle.key_metrics
    }

    /// Ratios periods of the current view, newest first.
    #[must_use]
    pub fn ratios(&self) -> &[Ratios] {
        &self.bundle.ratios
    }

    /// Derived metric rows of the current view, ascending by fiscal year.
    #[must_use]
    pub fn metrics(&self) -> &[FiscalYearMetrics] {
        &self.metrics
    }

    /// Clears the current view.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
