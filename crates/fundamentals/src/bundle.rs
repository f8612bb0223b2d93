//! Batch loading of all statement kinds for one symbol.

use fundamentals_core::{
    BalanceSheet, CashFlowStatement, IncomeStatement, KeyMetrics, Ratios, Result, StatementRecord,
    Symbol,
};

use crate::loader::{LoadOptions, StatementLoader};

/// All five statement collections for one symbol, each sorted by period end
/// date descending (most recent period first).
///
/// The collections are joinable on the fiscal-year field carried by each
/// record; [`derive_metrics`](crate::metrics::derive_metrics) consumes a
/// bundle that way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementBundle {
    /// Balance sheet periods.
    pub balance_sheets: Vec<BalanceSheet>,
    /// Income statement periods.
    pub income_statements: Vec<IncomeStatement>,
    /// Cash flow statement periods.
    pub cash_flows: Vec<CashFlowStatement>,
    /// Key metrics periods.
    pub key_metrics: Vec<KeyMetrics>,
    /// Financial ratios periods.
    pub ratios: Vec<Ratios>,
}

impl StatementBundle {
    /// True when every collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balance_sheets.is_empty()
            && self.income_statements.is_empty()
            && self.cash_flows.is_empty()
            && self.key_metrics.is_empty()
            && self.ratios.is_empty()
    }
}

fn sort_newest_first<R: StatementRecord>(records: &mut [R]) {
    records.sort_by(|a, b| b.date().cmp(&a.date()));
}

impl StatementLoader {
    /// Loads every dataset kind for one symbol.
    ///
    /// The five loads run concurrently; they address disjoint store
    /// partitions, so they cannot interfere. Each collection comes back
    /// sorted by date descending.
    ///
    /// # Errors
    /// The first failing load aborts the batch and its error is returned.
    pub async fn load_bundle(
        &self,
        symbol: &Symbol,
        limit: Option<usize>,
    ) -> Result<StatementBundle> {
        let options = LoadOptions {
            limit,
            ..LoadOptions::default()
        };

        let (mut balance_sheets, mut income_statements, mut cash_flows, mut key_metrics, mut ratios) =
            tokio::try_join!(
                self.load::<BalanceSheet>(symbol, &options),
                self.load::<IncomeStatement>(symbol, &options),
                self.load::<CashFlowStatement>(symbol, &options),
                self.load::<KeyMetrics>(symbol, &options),
                self.load::<Ratios>(symbol, &options),
            )?;

        sort_newest_first(&mut balance_sheets);
        sort_newest_first(&mut income_statements);
        sort_newest_first(&mut cash_flows);
        sort_newest_first(&mut key_metrics);
        sort_newest_first(&mut ratios);

        Ok(StatementBundle {
            balance_sheets,
            income_statements,
            cash_flows,
            key_metrics,
            ratios,
        })
    }
}
