use actix_web::{get, web, HttpResponse};

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::SessionUser;
use crate::period::month_range;
use crate::state::AppState;

use super::models::{
    is_record_id, BankTransactionsQuery, CardTransactionsQuery, TransactionsResponse,
};
use super::service::TransactionService;

/// Treat blank query values the same as missing ones.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn check_record_id(name: &str, id: &str) -> Result<(), AppError> {
    if is_record_id(id) {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "{name} is not a valid record id."
        )))
    }
}

/// GET /api/bank-transactions - Expenses, income and investments of one bank account for a month
#[utoipa::path(
    get,
    path = "/api/bank-transactions",
    tag = "Transactions",
    params(BankTransactionsQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = TransactionsResponse),
        (status = 400, description = "Missing or invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/bank-transactions")]
pub async fn bank_transactions(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<BankTransactionsQuery>,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;

    let (Some(bank_account_id), Some(month), Some(year)) = (
        present(&query.bank_account_id),
        present(&query.month),
        present(&query.year),
    ) else {
        return Err(AppError::ValidationError(
            "bankAccountId, month, and year are required query parameters.".to_string(),
        ));
    };

    check_record_id("bankAccountId", bank_account_id)?;
    let (_, _, range) = month_range(month, year)?;

    let (transactions, warnings) =
        TransactionService::for_bank_account(state.get_ref(), bank_account_id, &range).await?;

    Ok(HttpResponse::Ok().json(TransactionsResponse {
        transactions,
        warnings,
    }))
}

/// GET /api/credit-card-transactions - Expenses charged to one credit card for a month
#[utoipa::path(
    get,
    path = "/api/credit-card-transactions",
    tag = "Transactions",
    params(CardTransactionsQuery),
    responses(
        (status = 200, description = "Transactions, newest first", body = TransactionsResponse),
        (status = 400, description = "Missing or invalid query parameters", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/credit-card-transactions")]
pub async fn credit_card_transactions(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<CardTransactionsQuery>,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;

    let (Some(credit_card_id), Some(month), Some(year)) = (
        present(&query.credit_card_id),
        present(&query.month),
        present(&query.year),
    ) else {
        return Err(AppError::ValidationError(
            "creditCardId, month, and year are required query parameters.".to_string(),
        ));
    };

    check_record_id("creditCardId", credit_card_id)?;
    let (_, _, range) = month_range(month, year)?;

    let (transactions, warnings) =
        TransactionService::for_credit_card(state.get_ref(), credit_card_id, &range).await?;

    Ok(HttpResponse::Ok().json(TransactionsResponse {
        transactions,
        warnings,
    }))
}
