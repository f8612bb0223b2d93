//! Fiscal-year metric derivation.
//!
//! Joins the per-kind statement tables on fiscal year and computes the
//! derived figures the narrative layer consumes (net debt, payout ratios,
//! margins). The join is an outer join over the union of fiscal years;
//! a figure whose inputs are missing for a year, or whose denominator is
//! zero, comes out as `None` rather than poisoning the row.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::warn;

use fundamentals_core::{BalanceSheet, CashFlowStatement, IncomeStatement, StatementRecord};

use crate::bundle::StatementBundle;

/// Derived figures for one fiscal year.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FiscalYearMetrics {
    /// The fiscal year the row was joined on.
    pub fiscal_year: i32,

    /// Short-term plus long-term debt, less cash and cash equivalents.
    pub net_debt: Option<Decimal>,
    /// Common stock repurchases, signed as an outflow.
    pub buybacks: Option<Decimal>,
    /// Common dividends paid, signed as an outflow.
    pub dividends: Option<Decimal>,

    /// Operating cash flow over net income.
    pub ocf_to_net_income: Option<Decimal>,
    /// Free cash flow over net income.
    pub fcf_to_net_income: Option<Decimal>,
    /// Capital expenditure over revenue.
    pub capex_to_revenue: Option<Decimal>,
    /// Buybacks as a share of free cash flow.
    pub buyback_pct_of_fcf: Option<Decimal>,
    /// Dividends as a share of free cash flow.
    pub dividend_pct_of_fcf: Option<Decimal>,
    /// Buybacks plus dividends as a share of free cash flow.
    pub payout_pct_of_fcf: Option<Decimal>,

    /// Total assets over total liabilities.
    pub current_ratio: Option<Decimal>,
    /// Total debt over total stockholders' equity.
    pub debt_to_equity: Option<Decimal>,

    /// Gross profit over revenue.
    pub gross_margin: Option<Decimal>,
    /// Operating income over revenue.
    pub operating_margin: Option<Decimal>,
    /// Net income over revenue.
    pub net_margin: Option<Decimal>,
}

/// Division that treats a missing operand or a zero denominator as `None`.
fn div(numerator: Option<Decimal>, denominator: Option<Decimal>) -> Option<Decimal> {
    numerator?.checked_div(denominator?)
}

/// Indexes records by parsed fiscal year; the latest period per year wins.
fn by_fiscal_year<R: StatementRecord>(records: &[R]) -> BTreeMap<i32, &R> {
    let mut index: BTreeMap<i32, &R> = BTreeMap::new();
    for record in records {
        let Some(label) = record.fiscal_year() else {
            continue;
        };
        let Ok(year) = label.trim().parse::<i32>() else {
            warn!(kind = %R::KIND, fiscal_year = label, "Skipping row with unparsable fiscal year");
            continue;
        };
        index
            .entry(year)
            .and_modify(|existing| {
                if record.date() > existing.date() {
                    *existing = record;
                }
            })
            .or_insert(record);
    }
    index
}

/// Joins the statement tables on fiscal year and derives the metric rows,
/// ascending by year.
#[must_use]
pub fn derive_metrics(bundle: &StatementBundle) -> Vec<FiscalYearMetrics> {
    let income = by_fiscal_year(&bundle.income_statements);
    let balance = by_fiscal_year(&bundle.balance_sheets);
    let cash_flow = by_fiscal_year(&bundle.cash_flows);

    let mut years: Vec<i32> = income
        .keys()
        .chain(balance.keys())
        .chain(cash_flow.keys())
        .copied()
        .collect();
    years.sort_unstable();
    years.dedup();

    years
        .into_iter()
        .map(|year| {
            derive_year(
                year,
                income.get(&year).copied(),
                balance.get(&year).copied(),
                cash_flow.get(&year).copied(),
            )
        })
        .collect()
}

fn derive_year(
    fiscal_year: i32,
    income: Option<&IncomeStatement>,
    balance: Option<&BalanceSheet>,
    cash_flow: Option<&CashFlowStatement>,
) -> FiscalYearMetrics {
    let revenue = income.map(|i| i.revenue);
    let net_income = income.map(|i| i.net_income);
    let free_cash_flow = cash_flow.map(|c| c.free_cash_flow);

    let total_debt = balance.map(|b| b.short_term_debt + b.long_term_debt);
    let net_debt = balance.map(|b| b.short_term_debt + b.long_term_debt - b.cash_and_cash_equivalents);
    let buybacks = cash_flow.map(|c| -c.common_stock_repurchased);
    let dividends = cash_flow.map(|c| -c.common_dividends_paid);
    let payout = match (buybacks, dividends) {
        (Some(b), Some(d)) => Some(b + d),
        _ => None,
    };

    FiscalYearMetrics {
        fiscal_year,
        net_debt,
        buybacks,
        dividends,
        ocf_to_net_income: div(cash_flow.map(|c| c.operating_cash_flow), net_income),
        fcf_to_net_income: div(free_cash_flow, net_income),
        capex_to_revenue: div(cash_flow.map(|c| c.capital_expenditure), revenue),
        buyback_pct_of_fcf: div(buybacks, free_cash_flow),
        dividend_pct_of_fcf: div(dividends, free_cash_flow),
        payout_pct_of_fcf: div(payout, free_cash_flow),
        current_ratio: div(balance.map(|b| b.total_assets), balance.map(|b| b.total_liabilities)),
        debt_to_equity: div(total_debt, balance.map(|b| b.total_stockholders_equity)),
        gross_margin: div(income.map(|i| i.gross_profit), revenue),
        operating_margin: div(income.map(|i| i.operating_income), revenue),
        net_margin: div(income.map(|i| i.net_income), revenue),
    }
}
