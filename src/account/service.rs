use rust_decimal::Decimal;
use tracing::warn;

use super::models::{BankAccount, CreditCard};
use crate::config::Table;
use crate::errors::AppError;
use crate::remote::models::{Page, PropertyError};
use crate::state::AppState;

/// Service layer for bank accounts and credit cards.
pub struct AccountService;

impl AccountService {
    async fn fetch_rows<T>(
        state: &AppState,
        label: &str,
        table: Table,
        map: fn(&Page) -> Result<T, PropertyError>,
    ) -> Result<(Vec<T>, Vec<String>), AppError> {
        let fetched = state
            .fetcher()
            .fetch(label, state.config.tables.get(table), None)
            .await?;

        let rows = fetched
            .pages
            .iter()
            .filter_map(|page| match map(page) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!(record_id = %page.id, error = %e, "Skipping unmappable {label} row");
                    None
                }
            })
            .collect();

        Ok((rows, fetched.warning.into_iter().collect()))
    }

    /// All bank accounts, in the order the remote returns them.
    pub async fn list_bank_accounts(
        state: &AppState,
    ) -> Result<(Vec<BankAccount>, Vec<String>), AppError> {
        Self::fetch_rows(state, "bank accounts", Table::BankAccounts, BankAccount::from_page).await
    }

    /// All credit cards, in the order the remote returns them.
    pub async fn list_credit_cards(
        state: &AppState,
    ) -> Result<(Vec<CreditCard>, Vec<String>), AppError> {
        Self::fetch_rows(state, "credit cards", Table::CreditCards, CreditCard::from_page).await
    }

    /// Sum of all bank account balances.
    pub async fn total_bank_balance(state: &AppState) -> Result<(Decimal, Vec<String>), AppError> {
        let (accounts, warnings) = Self::list_bank_accounts(state).await?;
        let total = accounts.iter().fold(Decimal::ZERO, |total, account| {
            total.checked_add(account.balance).unwrap_or_else(|| {
                warn!(account_id = %account.id, "Balance overflows total, skipping");
                total
            })
        });
        Ok((total, warnings))
    }
}
