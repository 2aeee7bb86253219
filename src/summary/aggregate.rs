//! Groups transactions into per-category totals.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use super::models::{AggregatedRow, UNCATEGORIZED};
use crate::period::Month;
use crate::sort;
use crate::transaction::models::Transaction;

fn name_of(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|name| !name.is_empty())
}

/// Sum `transactions` by `(category, sub-category)`.
///
/// Transactions with neither a category nor a sub-category are left out; a
/// missing half of the key becomes [`UNCATEGORIZED`]. An amount that would
/// overflow its row's total is skipped. Rows come back sorted by category,
/// then sub-category.
pub fn aggregate(
    transactions: &[Transaction],
    month: Month,
    year: i32,
    currency_symbol: &str,
) -> Vec<AggregatedRow> {
    let mut totals: HashMap<(&str, &str), Decimal> = HashMap::new();

    for transaction in transactions {
        let category = name_of(&transaction.category);
        let sub_category = name_of(&transaction.sub_category);
        if category.is_none() && sub_category.is_none() {
            continue;
        }

        let key = (
            category.unwrap_or(UNCATEGORIZED),
            sub_category.unwrap_or(UNCATEGORIZED),
        );
        let total = totals.entry(key).or_insert(Decimal::ZERO);
        match total.checked_add(transaction.amount) {
            Some(sum) => *total = sum,
            None => warn!(record_id = %transaction.id, "Amount overflows category total, skipping"),
        }
    }

    let mut rows: Vec<AggregatedRow> = totals
        .into_iter()
        .map(|((category, sub_category), total)| AggregatedRow {
            year,
            month: month.abbreviation().to_string(),
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            total_amount: total,
            formatted_total: format!("{currency_symbol}{}", total.normalize()),
        })
        .collect();

    sort::by_category(&mut rows);
    rows
}
