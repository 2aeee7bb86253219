use futures::try_join;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::aggregate::aggregate;
use super::models::{AggregatedRow, MonthlySummary, YearlySummaryResponse};
use crate::account::service::AccountService;
use crate::errors::AppError;
use crate::period::{month_of, month_range, parse_year, DateRange, Month};
use crate::remote::Filter;
use crate::state::AppState;
use crate::transaction::models::{Ledger, Transaction};
use crate::transaction::service::TransactionService;

/// Service layer for the monthly breakdowns and the yearly summary.
pub struct SummaryService;

impl SummaryService {
    /// Per-category totals of `ledger` for one month.
    ///
    /// Callers check the API key and the ledger's table before calling, so
    /// configuration errors win over bad parameters.
    pub async fn monthly_breakdown(
        state: &AppState,
        ledger: Ledger,
        month: &str,
        year: &str,
    ) -> Result<(Vec<AggregatedRow>, Vec<String>), AppError> {
        let (month, year, range) = month_range(month, year)?;
        info!(
            ledger = ledger.label(),
            from = %range.start_str(),
            to = %range.end_str(),
            "Building monthly breakdown"
        );

        let filter = Filter::date_range(ledger.schema().date_field, &range, None);
        let fetched = TransactionService::fetch_ledger(state, ledger, &filter).await?;
        let mut warnings = fetched.warnings;

        let mut records = fetched.records;
        if ledger == Ledger::Expenses {
            records.retain(|record| !record.transaction.amount.is_zero());
        }

        let transactions =
            TransactionService::resolve_categories(state, ledger, records, &mut warnings).await?;

        let rows = aggregate(&transactions, month, year, &state.config.currency_symbol);
        Ok((rows, warnings))
    }

    /// Twelve monthly totals of expenses, income and investments, plus the
    /// current total bank balance.
    pub async fn yearly(state: &AppState, year: &str) -> Result<YearlySummaryResponse, AppError> {
        let year = parse_year(year)?;
        let range = DateRange::for_year(year)?;

        let (expenses, income, investments, (total_bank_balance, balance_warnings)) = try_join!(
            Self::ledger_for_year(state, Ledger::Expenses, &range),
            Self::ledger_for_year(state, Ledger::Income, &range),
            Self::ledger_for_year(state, Ledger::Investments, &range),
            AccountService::total_bank_balance(state),
        )?;

        let mut warnings = Vec::new();
        let expense = Self::monthly_totals(&expenses.0, &range);
        let income_totals = Self::monthly_totals(&income.0, &range);
        let investment = Self::monthly_totals(&investments.0, &range);
        warnings.extend(expenses.1);
        warnings.extend(income.1);
        warnings.extend(investments.1);
        warnings.extend(balance_warnings);

        let summary_data = Month::ALL
            .into_iter()
            .map(|month| {
                let index = month.number() as usize - 1;
                MonthlySummary {
                    month: month.abbreviation().to_string(),
                    expense: expense[index],
                    income: income_totals[index],
                    investment: investment[index],
                }
            })
            .collect();

        Ok(YearlySummaryResponse {
            summary_data,
            total_bank_balance,
            warnings,
        })
    }

    async fn ledger_for_year(
        state: &AppState,
        ledger: Ledger,
        range: &DateRange,
    ) -> Result<(Vec<Transaction>, Vec<String>), AppError> {
        let filter = Filter::date_range(ledger.schema().date_field, range, None);
        let fetched = TransactionService::fetch_ledger(state, ledger, &filter).await?;
        let transactions = fetched
            .records
            .into_iter()
            .map(|record| record.transaction)
            .collect();
        Ok((transactions, fetched.warnings))
    }

    /// Sum amounts per calendar month; undated or out-of-range records are ignored.
    fn monthly_totals(transactions: &[Transaction], range: &DateRange) -> [Decimal; 12] {
        let mut totals = [Decimal::ZERO; 12];
        for transaction in transactions {
            if let Some(date) = transaction.date.filter(|d| range.contains(*d)) {
                let total = &mut totals[month_of(date).number() as usize - 1];
                match total.checked_add(transaction.amount) {
                    Some(sum) => *total = sum,
                    None => warn!(record_id = %transaction.id, "Amount overflows monthly total, skipping"),
                }
            }
        }
        totals
    }
}
