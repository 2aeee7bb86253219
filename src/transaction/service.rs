use std::collections::HashMap;

use futures::future::join_all;
use futures::join;
use tracing::warn;

use super::mapper::map_records;
use super::models::{CategoryValue, Ledger, MappedRecord, Transaction};
use crate::category::referenced_ids;
use crate::config::SourceErrorPolicy;
use crate::errors::AppError;
use crate::period::DateRange;
use crate::remote::Filter;
use crate::sort;
use crate::state::AppState;

/// Records mapped from one ledger, plus any warning raised while fetching.
pub struct LedgerRecords {
    pub records: Vec<MappedRecord>,
    pub warnings: Vec<String>,
}

/// Service layer for fetching and combining transactions.
pub struct TransactionService;

impl TransactionService {
    /// Fetch and map the records of `ledger` matching `filter`.
    pub async fn fetch_ledger(
        state: &AppState,
        ledger: Ledger,
        filter: &Filter,
    ) -> Result<LedgerRecords, AppError> {
        let fetched = state
            .fetcher()
            .fetch(
                ledger.label(),
                state.config.tables.get(ledger.table()),
                Some(filter),
            )
            .await?;

        let records = map_records(
            &fetched.pages,
            &ledger.schema(),
            ledger.transaction_type(),
        );

        Ok(LedgerRecords {
            records,
            warnings: fetched.warning.into_iter().collect(),
        })
    }

    /// Fill in category names on every record of `ledger`.
    ///
    /// Each lookup table is consulted once for the distinct ids the records
    /// reference. A failed lookup leaves the names empty and, depending on
    /// policy, either adds a warning or fails the request.
    pub async fn resolve_categories(
        state: &AppState,
        ledger: Ledger,
        records: Vec<MappedRecord>,
        warnings: &mut Vec<String>,
    ) -> Result<Vec<Transaction>, AppError> {
        let (category_table, sub_category_table) = ledger.category_tables();

        let category_ids = referenced_ids(records.iter().filter_map(|r| r.category.as_ref()));
        let sub_category_ids = match sub_category_table {
            Some(_) => referenced_ids(records.iter().filter_map(|r| r.sub_category.as_ref())),
            None => Vec::new(),
        };

        let (categories, sub_categories) = join!(
            state.categories.names(category_table, &category_ids),
            async {
                match sub_category_table {
                    Some(table) => state.categories.names(table, &sub_category_ids).await,
                    None => Ok(HashMap::new()),
                }
            }
        );

        let failure = match (&categories, &sub_categories) {
            (Err(e), _) | (_, Err(e)) => Some(e.to_string()),
            _ => None,
        };
        if let Some(e) = failure {
            match state.config.source_error_policy {
                SourceErrorPolicy::Degrade => {
                    warn!(ledger = ledger.label(), error = %e, "Category names could not be resolved");
                    warnings.push(format!(
                        "Category names for {} could not be loaded",
                        ledger.label()
                    ));
                }
                SourceErrorPolicy::Propagate => {
                    return Err(AppError::RemoteFetchFailed(format!(
                        "Failed to resolve category names for {}: {e}",
                        ledger.label()
                    )))
                }
            }
        }

        let categories = categories.ok();
        let sub_categories = sub_category_table.and(sub_categories.ok());

        Ok(records
            .into_iter()
            .map(|record| {
                let mut transaction = record.transaction;
                transaction.category = name_of(record.category, categories.as_ref());
                if sub_category_table.is_some() {
                    transaction.sub_category =
                        name_of(record.sub_category, sub_categories.as_ref());
                }
                transaction
            })
            .collect())
    }

    /// Expenses, income and investments of one bank account within `range`,
    /// newest first.
    pub async fn for_bank_account(
        state: &AppState,
        bank_account_id: &str,
        range: &DateRange,
    ) -> Result<(Vec<Transaction>, Vec<String>), AppError> {
        let filters: Vec<(Ledger, Filter)> = Ledger::ALL
            .into_iter()
            .map(|ledger| {
                let schema = ledger.schema();
                let filter = Filter::date_range(
                    schema.date_field,
                    range,
                    Some((schema.relation_field, bank_account_id)),
                );
                (ledger, filter)
            })
            .collect();

        let results = join_all(
            filters
                .iter()
                .map(|(ledger, filter)| Self::fetch_ledger(state, *ledger, filter)),
        )
        .await;

        let mut transactions = Vec::new();
        let mut warnings = Vec::new();
        for result in results {
            let fetched = result?;
            transactions.extend(fetched.records.into_iter().map(|r| r.transaction));
            warnings.extend(fetched.warnings);
        }

        sort::by_date_desc(&mut transactions);
        Ok((transactions, warnings))
    }

    /// Expenses charged to one credit card within `range`, newest first.
    pub async fn for_credit_card(
        state: &AppState,
        credit_card_id: &str,
        range: &DateRange,
    ) -> Result<(Vec<Transaction>, Vec<String>), AppError> {
        let ledger = Ledger::Expenses;
        let schema = ledger.schema();
        let relation = ledger.card_relation().map(|property| (property, credit_card_id));
        let filter = Filter::date_range(schema.date_field, range, relation);

        let fetched = Self::fetch_ledger(state, ledger, &filter).await?;

        let mut transactions: Vec<Transaction> = fetched
            .records
            .into_iter()
            .map(|r| r.transaction)
            .collect();
        sort::by_date_desc(&mut transactions);

        Ok((transactions, fetched.warnings))
    }
}

/// Display name for a record's category value; `None` when the lookup failed.
fn name_of(
    value: Option<CategoryValue>,
    names: Option<&HashMap<String, String>>,
) -> Option<String> {
    match value? {
        CategoryValue::Name(name) => Some(name),
        CategoryValue::Reference(id) => names.map(|n| n.get(&id).cloned().unwrap_or_default()),
    }
}
