use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::sort::Categorized;

/// Name used when a record has no category or sub-category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One category / sub-category total for a month
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRow {
    #[schema(example = 2024)]
    pub year: i32,
    /// Three-letter month abbreviation
    #[schema(example = "Feb")]
    pub month: String,
    #[schema(example = "Food")]
    pub category: String,
    #[schema(example = "Groceries")]
    pub sub_category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 150.0)]
    pub total_amount: Decimal,
    /// Total prefixed with the configured currency symbol
    #[schema(example = "₹150")]
    pub formatted_total: String,
}

impl Categorized for AggregatedRow {
    fn category(&self) -> &str {
        &self.category
    }

    fn sub_category(&self) -> &str {
        &self.sub_category
    }
}

/// Query parameters for the monthly breakdowns
#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    /// Month name or abbreviation, any case
    #[param(example = "Feb")]
    pub month: Option<String>,
    /// 4-digit year
    #[param(example = "2024")]
    pub year: Option<String>,
}

/// Query parameters for the yearly summary
#[derive(Debug, Deserialize, IntoParams)]
pub struct YearQuery {
    #[param(example = "2024")]
    pub year: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpensesResponse {
    pub monthly_expenses: Vec<AggregatedRow>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncomeResponse {
    pub monthly_income: Vec<AggregatedRow>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyInvestmentsResponse {
    pub monthly_investments: Vec<AggregatedRow>,
    pub warnings: Vec<String>,
}

/// Totals of one month
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySummary {
    #[schema(example = "Jan")]
    pub month: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub expense: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub investment: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummaryResponse {
    /// Always twelve entries, January first
    pub summary_data: Vec<MonthlySummary>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_bank_balance: Decimal,
    pub warnings: Vec<String>,
}
