//! Typed financial statement records.
//!
//! This module defines the row types for each [`DatasetKind`]:
//!
//! - [`BalanceSheet`], [`IncomeStatement`], [`CashFlowStatement`] - Rigid
//!   vendor schemas; every line item is required and unknown fields are dropped
//! - [`KeyMetrics`], [`Ratios`] - Flexible schemas; a small required core plus
//!   all remaining vendor fields preserved as-is
//!
//! Monetary and per-share fields are [`Decimal`] so vendor values survive
//! serialization without binary floating point coercion. Rows are validated
//! one at a time: [`decode_rows`] skips and logs rows that fail validation
//! instead of failing the batch.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{FundamentalsError, Result};
use crate::types::DatasetKind;

/// Behavior shared by all typed statement rows.
///
/// Each record type is tied to exactly one [`DatasetKind`], which keys both
/// the remote resource and the cache partition the rows live in.
pub trait StatementRecord:
    Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// The dataset kind this record type belongs to.
    const KIND: DatasetKind;

    /// End date of the reporting period for this row.
    fn date(&self) -> NaiveDate;

    /// Fiscal year label of this row, if reported.
    fn fiscal_year(&self) -> Option<&str>;
}

/// One balance sheet reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    pub reported_currency: String,
    /// SEC CIK number.
    pub cik: String,
    /// Date the statement was filed.
    pub filing_date: String,
    /// Timestamp the filing was accepted.
    pub accepted_date: String,
    /// Fiscal year label (e.g. "2024").
    pub fiscal_year: String,
    /// Reporting period label (e.g. "FY", "Q1").
    pub period: String,

    // Current assets
    /// Cash and cash equivalents.
    pub cash_and_cash_equivalents: Decimal,
    /// Short-term investments.
    pub short_term_investments: Decimal,
    /// Cash and short-term investments.
    pub cash_and_short_term_investments: Decimal,
    /// Net receivables.
    pub net_receivables: Decimal,
    /// Accounts receivable.
    pub accounts_receivables: Decimal,
    /// Other receivables.
    pub other_receivables: Decimal,
    /// Inventory.
    pub inventory: Decimal,
    /// Prepaid expenses.
    pub prepaids: Decimal,
    /// Other current assets.
    pub other_current_assets: Decimal,
    /// Total current assets.
    pub total_current_assets: Decimal,

    // Non-current assets
    /// Property, plant and equipment, net.
    pub property_plant_equipment_net: Decimal,
    /// Goodwill.
    pub goodwill: Decimal,
    /// Intangible assets.
    pub intangible_assets: Decimal,
    /// Goodwill and intangible assets.
    pub goodwill_and_intangible_assets: Decimal,
    /// Long-term investments.
    pub long_term_investments: Decimal,
    /// Tax assets.
    pub tax_assets: Decimal,
    /// Other non-current assets.
    pub other_non_current_assets: Decimal,
    /// Total non-current assets.
    pub total_non_current_assets: Decimal,
    /// Other assets.
    pub other_assets: Decimal,
    /// Total assets.
    pub total_assets: Decimal,

    // Current liabilities
    /// Total payables.
    pub total_payables: Decimal,
    /// Accounts payable.
    pub account_payables: Decimal,
    /// Other payables.
    pub other_payables: Decimal,
    /// Accrued expenses.
    pub accrued_expenses: Decimal,
    /// Short-term debt.
    pub short_term_debt: Decimal,
    /// Current portion of capital lease obligations.
    pub capital_lease_obligations_current: Decimal,
    /// Tax payables.
    pub tax_payables: Decimal,
    /// Deferred revenue.
    pub deferred_revenue: Decimal,
    /// Other current liabilities.
    pub other_current_liabilities: Decimal,
    /// Total current liabilities.
    pub total_current_liabilities: Decimal,

    // Non-current liabilities
    /// Long-term debt.
    pub long_term_debt: Decimal,
    /// Non-current deferred revenue.
    pub deferred_revenue_non_current: Decimal,
    /// Non-current deferred tax liabilities.
    pub deferred_tax_liabilities_non_current: Decimal,
    /// Other non-current liabilities.
    pub other_non_current_liabilities: Decimal,
    /// Total non-current liabilities.
    pub total_non_current_liabilities: Decimal,
    /// Other liabilities.
    pub other_liabilities: Decimal,
    /// Capital lease obligations.
    pub capital_lease_obligations: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,

    // Equity
    /// Treasury stock.
    pub treasury_stock: Decimal,
    /// Preferred stock.
    pub preferred_stock: Decimal,
    /// Common stock.
    pub common_stock: Decimal,
    /// Retained earnings.
    pub retained_earnings: Decimal,
    /// Additional paid-in capital.
    pub additional_paid_in_capital: Decimal,
    /// Accumulated other comprehensive income or loss.
    pub accumulated_other_comprehensive_income_loss: Decimal,
    /// Other total stockholders' equity.
    pub other_total_stockholders_equity: Decimal,
    /// Total stockholders' equity.
    pub total_stockholders_equity: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Minority interest.
    pub minority_interest: Decimal,
    /// Total liabilities and total equity.
    pub total_liabilities_and_total_equity: Decimal,

    // Summary items
    /// Total investments.
    pub total_investments: Decimal,
    /// Total debt.
    pub total_debt: Decimal,
    /// Net debt.
    pub net_debt: Decimal,
}

impl StatementRecord for BalanceSheet {
    const KIND: DatasetKind = DatasetKind::BalanceSheet;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fiscal_year(&self) -> Option<&str> {
        Some(&self.fiscal_year)
    }
}

/// One income statement reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    pub reported_currency: String,
    /// SEC CIK number.
    pub cik: String,
    /// Date the statement was filed.
    pub filing_date: String,
    /// Timestamp the filing was accepted.
    pub accepted_date: String,
    /// Fiscal year label (e.g. "2024").
    pub fiscal_year: String,
    /// Reporting period label (e.g. "FY", "Q1").
    pub period: String,

    /// Total revenue.
    pub revenue: Decimal,
    /// Cost of revenue.
    pub cost_of_revenue: Decimal,
    /// Gross profit.
    pub gross_profit: Decimal,

    // Operating expenses
    /// Research and development expenses.
    pub research_and_development_expenses: Decimal,
    /// General and administrative expenses.
    pub general_and_administrative_expenses: Decimal,
    /// Selling and marketing expenses.
    pub selling_and_marketing_expenses: Decimal,
    /// Selling, general and administrative expenses.
    pub selling_general_and_administrative_expenses: Decimal,
    /// Other expenses.
    pub other_expenses: Decimal,
    /// Operating expenses.
    pub operating_expenses: Decimal,
    /// Cost and expenses.
    pub cost_and_expenses: Decimal,

    // Interest
    /// Net interest income.
    pub net_interest_income: Decimal,
    /// Interest income.
    pub interest_income: Decimal,
    /// Interest expense.
    pub interest_expense: Decimal,

    /// Depreciation and amortization.
    pub depreciation_and_amortization: Decimal,
    /// EBITDA.
    pub ebitda: Decimal,
    /// EBIT.
    pub ebit: Decimal,

    // Income
    /// Non-operating income excluding interest.
    pub non_operating_income_excluding_interest: Decimal,
    /// Operating income.
    pub operating_income: Decimal,
    /// Total other income and expenses, net.
    pub total_other_income_expenses_net: Decimal,
    /// Income before tax.
    pub income_before_tax: Decimal,
    /// Income tax expense.
    pub income_tax_expense: Decimal,
    /// Net income from continuing operations.
    pub net_income_from_continuing_operations: Decimal,
    /// Net income from discontinued operations.
    pub net_income_from_discontinued_operations: Decimal,
    /// Other adjustments to net income.
    pub other_adjustments_to_net_income: Decimal,
    /// Net income.
    pub net_income: Decimal,
    /// Net income deductions.
    pub net_income_deductions: Decimal,
    /// Bottom line net income.
    pub bottom_line_net_income: Decimal,

    // Per share
    /// Basic earnings per share.
    pub eps: Decimal,
    /// Diluted earnings per share.
    pub eps_diluted: Decimal,
    /// Weighted average shares outstanding.
    pub weighted_average_shs_out: Decimal,
    /// Weighted average shares outstanding, diluted.
    pub weighted_average_shs_out_dil: Decimal,
}

impl StatementRecord for IncomeStatement {
    const KIND: DatasetKind = DatasetKind::IncomeStatement;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fiscal_year(&self) -> Option<&str> {
        Some(&self.fiscal_year)
    }
}

/// One cash flow statement reporting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowStatement {
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Stock symbol.
    pub symbol: String,
    /// Currency the statement is reported in.
    pub reported_currency: String,
    /// SEC CIK number.
    pub cik: String,
    /// Date the statement was filed.
    pub filing_date: String,
    /// Timestamp the filing was accepted.
    pub accepted_date: String,
    /// Fiscal year label (e.g. "2024").
    pub fiscal_year: String,
    /// Reporting period label (e.g. "FY", "Q1").
    pub period: String,

    // Operating activities
    /// Net income.
    pub net_income: Decimal,
    /// Depreciation and amortization.
    pub depreciation_and_amortization: Decimal,
    /// Deferred income tax.
    pub deferred_income_tax: Decimal,
    /// Stock-based compensation.
    pub stock_based_compensation: Decimal,
    /// Change in working capital.
    pub change_in_working_capital: Decimal,
    /// Change in accounts receivable.
    pub accounts_receivables: Decimal,
    /// Change in inventory.
    pub inventory: Decimal,
    /// Change in accounts payable.
    pub accounts_payables: Decimal,
    /// Other working capital changes.
    pub other_working_capital: Decimal,
    /// Other non-cash items.
    pub other_non_cash_items: Decimal,
    /// Net cash provided by operating activities.
    pub net_cash_provided_by_operating_activities: Decimal,

    // Investing activities
    /// Investments in property, plant and equipment.
    pub investments_in_property_plant_and_equipment: Decimal,
    /// Acquisitions, net of cash acquired.
    pub acquisitions_net: Decimal,
    /// Purchases of investments.
    pub purchases_of_investments: Decimal,
    /// Sales and maturities of investments.
    pub sales_maturities_of_investments: Decimal,
    /// Other investing activities.
    pub other_investing_activities: Decimal,
    /// Net cash provided by investing activities.
    pub net_cash_provided_by_investing_activities: Decimal,

    // Financing activities
    /// Net debt issuance.
    pub net_debt_issuance: Decimal,
    /// Long-term net debt issuance.
    pub long_term_net_debt_issuance: Decimal,
    /// Short-term net debt issuance.
    pub short_term_net_debt_issuance: Decimal,
    /// Net stock issuance.
    pub net_stock_issuance: Decimal,
    /// Net common stock issuance.
    pub net_common_stock_issuance: Decimal,
    /// Common stock issuance.
    pub common_stock_issuance: Decimal,
    /// Common stock repurchased.
    pub common_stock_repurchased: Decimal,
    /// Net preferred stock issuance.
    pub net_preferred_stock_issuance: Decimal,
    /// Net dividends paid.
    pub net_dividends_paid: Decimal,
    /// Common dividends paid.
    pub common_dividends_paid: Decimal,
    /// Preferred dividends paid.
    pub preferred_dividends_paid: Decimal,
    /// Other financing activities.
    pub other_financing_activities: Decimal,
    /// Net cash provided by financing activities.
    pub net_cash_provided_by_financing_activities: Decimal,

    // Totals
    /// Effect of foreign exchange changes on cash.
    pub effect_of_forex_changes_on_cash: Decimal,
    /// Net change in cash.
    pub net_change_in_cash: Decimal,
    /// Cash at end of period.
    pub cash_at_end_of_period: Decimal,
    /// Cash at beginning of period.
    pub cash_at_beginning_of_period: Decimal,
    /// Operating cash flow.
    pub operating_cash_flow: Decimal,
    /// Capital expenditure.
    pub capital_expenditure: Decimal,
    /// Free cash flow.
    pub free_cash_flow: Decimal,
    /// Income taxes paid.
    pub income_taxes_paid: Decimal,
    /// Interest paid.
    pub interest_paid: Decimal,
}

impl StatementRecord for CashFlowStatement {
    const KIND: DatasetKind = DatasetKind::CashFlow;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fiscal_year(&self) -> Option<&str> {
        Some(&self.fiscal_year)
    }
}

/// One key metrics reporting period.
///
/// The vendor adds and renames metric fields often, so only the identifying
/// core is typed; everything else is preserved untouched in [`extra`].
///
/// [`extra`]: KeyMetrics::extra
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    /// Stock symbol.
    pub symbol: String,
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Fiscal year label, if reported.
    pub fiscal_year: Option<String>,
    /// Reporting period label, if reported.
    pub period: Option<String>,
    /// Currency the metrics are reported in, if reported.
    pub reported_currency: Option<String>,
    /// Remaining vendor fields, kept exactly as received.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StatementRecord for KeyMetrics {
    const KIND: DatasetKind = DatasetKind::KeyMetrics;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fiscal_year(&self) -> Option<&str> {
        self.fiscal_year.as_deref()
    }
}

/// One financial ratios reporting period.
///
/// Schema-flexible for the same reason as [`KeyMetrics`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    /// Stock symbol.
    pub symbol: String,
    /// End date of the reporting period.
    pub date: NaiveDate,
    /// Fiscal year label, if reported.
    pub fiscal_year: Option<String>,
    /// Reporting period label, if reported.
    pub period: Option<String>,
    /// Currency the ratios are reported in, if reported.
    pub reported_currency: Option<String>,
    /// Remaining vendor fields, kept exactly as received.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StatementRecord for Ratios {
    const KIND: DatasetKind = DatasetKind::Ratios;

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn fiscal_year(&self) -> Option<&str> {
        self.fiscal_year.as_deref()
    }
}

/// Decodes raw JSON rows into typed records, one row at a time.
///
/// Rows that fail validation (missing required field, wrong type, malformed
/// date) are skipped and logged; a bad row never fails the batch.
#[must_use]
pub fn decode_rows<R: StatementRecord>(rows: &[Value]) -> Vec<R> {
    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        match serde_json::from_value::<R>(row.clone()) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(
                    kind = %R::KIND,
                    row = index,
                    error = %e,
                    "Skipping statement row that failed validation"
                );
            }
        }
    }
    records
}

/// Serializes validated records back to plain JSON rows for storage.
pub fn encode_rows<R: StatementRecord>(records: &[R]) -> Result<Vec<Value>> {
    records
        .iter()
        .map(|record| {
            serde_json::to_value(record).map_err(|e| FundamentalsError::Store(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn income_row() -> Value {
        serde_json::from_str(
            r#"{
                "date": "2024-09-28",
                "symbol": "AAPL",
                "reportedCurrency": "USD",
                "cik": "0000320193",
                "filingDate": "2024-11-01",
                "acceptedDate": "2024-11-01 06:01:36",
                "fiscalYear": "2024",
                "period": "FY",
                "revenue": 391035000000,
                "costOfRevenue": 210352000000,
                "grossProfit": 180683000000,
                "researchAndDevelopmentExpenses": 31370000000,
                "generalAndAdministrativeExpenses": 0,
                "sellingAndMarketingExpenses": 0,
                "sellingGeneralAndAdministrativeExpenses": 26097000000,
                "otherExpenses": 0,
                "operatingExpenses": 57467000000,
                "costAndExpenses": 267819000000,
                "netInterestIncome": 0,
                "interestIncome": 0,
                "interestExpense": 0,
                "depreciationAndAmortization": 11445000000,
                "ebitda": 134661000000,
                "ebit": 123216000000,
                "nonOperatingIncomeExcludingInterest": 0,
                "operatingIncome": 123216000000,
                "totalOtherIncomeExpensesNet": 269000000,
                "incomeBeforeTax": 123485000000,
                "incomeTaxExpense": 29749000000,
                "netIncomeFromContinuingOperations": 93736000000,
                "netIncomeFromDiscontinuedOperations": 0,
                "otherAdjustmentsToNetIncome": 0,
                "netIncome": 93736000000,
                "netIncomeDeductions": 0,
                "bottomLineNetIncome": 93736000000,
                "eps": 6.11,
                "epsDiluted": 6.08,
                "weightedAverageShsOut": 15343783000,
                "weightedAverageShsOutDil": 15408095000
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_income_statement_decodes_vendor_row() {
        let record: IncomeStatement = serde_json::from_value(income_row()).unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(
            record.date,
            NaiveDate::from_ymd_opt(2024, 9, 28).unwrap()
        );
        assert_eq!(record.fiscal_year(), Some("2024"));
        assert_eq!(record.revenue, dec!(391035000000));
        assert_eq!(record.eps, dec!(6.11));
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let mut row = income_row();
        row.as_object_mut().unwrap().remove("revenue");
        assert!(serde_json::from_value::<IncomeStatement>(row).is_err());
    }

    #[test]
    fn test_unknown_fields_are_dropped_on_rigid_kinds() {
        let mut row = income_row();
        row.as_object_mut()
            .unwrap()
            .insert("brandNewVendorField".to_string(), Value::from(42));
        let record: IncomeStatement = serde_json::from_value(row).unwrap();

        let encoded = serde_json::to_value(&record).unwrap();
        assert!(encoded.get("brandNewVendorField").is_none());
        assert_eq!(encoded.get("symbol").unwrap(), "AAPL");
    }

    #[test]
    fn test_decode_rows_skips_invalid() {
        let mut bad = income_row();
        bad.as_object_mut().unwrap().remove("netIncome");
        let rows = vec![income_row(), bad, income_row()];

        let records: Vec<IncomeStatement> = decode_rows(&rows);
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_decimal_fidelity_round_trip() {
        let mut row = income_row();
        let patch: Value = serde_json::from_str(
            r#"{"revenue": 1234.5678, "eps": 0.123456789012345678901234567}"#,
        )
        .unwrap();
        row.as_object_mut()
            .unwrap()
            .extend(patch.as_object().unwrap().clone());

        let records: Vec<IncomeStatement> = decode_rows(&[row]);
        assert_eq!(records[0].revenue, dec!(1234.5678));
        assert_eq!(
            records[0].eps.to_string(),
            "0.123456789012345678901234567"
        );

        let encoded = encode_rows(&records).unwrap();
        let text = serde_json::to_string(&encoded[0]).unwrap();
        assert!(text.contains("1234.5678"));
        assert!(text.contains("0.123456789012345678901234567"));

        let again: Vec<IncomeStatement> = decode_rows(&encoded);
        assert_eq!(again[0], records[0]);
    }

    #[test]
    fn test_key_metrics_preserves_unknown_fields() {
        let row: Value = serde_json::from_str(
            r#"{
                "symbol": "AAPL",
                "date": "2024-09-28",
                "fiscalYear": "2024",
                "period": "FY",
                "reportedCurrency": "USD",
                "marketCap": 3846678928128.5678,
                "returnOnEquity": 1.6459350307287095
            }"#,
        )
        .unwrap();

        let record: KeyMetrics = serde_json::from_value(row).unwrap();
        assert_eq!(record.fiscal_year(), Some("2024"));
        assert!(record.extra.contains_key("marketCap"));

        let text = serde_json::to_string(&record).unwrap();
        assert!(text.contains("3846678928128.5678"));
    }

    #[test]
    fn test_key_metrics_optional_core_fields() {
        let row: Value =
            serde_json::from_str(r#"{"symbol": "AAPL", "date": "2024-09-28"}"#).unwrap();
        let record: KeyMetrics = serde_json::from_value(row).unwrap();
        assert_eq!(record.fiscal_year, None);
        assert!(record.extra.is_empty());
    }
}
