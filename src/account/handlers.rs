use actix_web::{get, web, HttpResponse};
use futures::try_join;

use crate::config::Table;
use crate::errors::{AppError, ErrorResponse};
use crate::extractors::SessionUser;
use crate::state::AppState;

use super::models::{BankAccountsResponse, CreditCardsResponse, FinancialDetailsResponse};
use super::service::AccountService;

/// GET /api/bank-details - List bank accounts with their balances
#[utoipa::path(
    get,
    path = "/api/bank-details",
    tag = "Accounts",
    responses(
        (status = 200, description = "Bank accounts", body = BankAccountsResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/bank-details")]
pub async fn bank_details(
    state: web::Data<AppState>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;
    state.config.tables.require(Table::BankAccounts)?;

    let (bank_accounts, warnings) = AccountService::list_bank_accounts(state.get_ref()).await?;

    Ok(HttpResponse::Ok().json(BankAccountsResponse {
        bank_accounts,
        warnings,
    }))
}

/// GET /api/credit-card-details - List credit cards with usage and limits
#[utoipa::path(
    get,
    path = "/api/credit-card-details",
    tag = "Accounts",
    responses(
        (status = 200, description = "Credit cards", body = CreditCardsResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/credit-card-details")]
pub async fn credit_card_details(
    state: web::Data<AppState>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;
    state.config.tables.require(Table::CreditCards)?;

    let (credit_card_details, warnings) =
        AccountService::list_credit_cards(state.get_ref()).await?;

    Ok(HttpResponse::Ok().json(CreditCardsResponse {
        credit_card_details,
        warnings,
    }))
}

/// GET /api/financial-details - Bank accounts and credit cards in one response
#[utoipa::path(
    get,
    path = "/api/financial-details",
    tag = "Accounts",
    responses(
        (status = 200, description = "Bank accounts and credit cards", body = FinancialDetailsResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/financial-details")]
pub async fn financial_details(
    state: web::Data<AppState>,
    _session: SessionUser,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;

    let ((bank_accounts, bank_warnings), (credit_cards, card_warnings)) = try_join!(
        AccountService::list_bank_accounts(state.get_ref()),
        AccountService::list_credit_cards(state.get_ref()),
    )?;

    Ok(HttpResponse::Ok().json(FinancialDetailsResponse {
        bank_accounts,
        credit_cards,
        warnings: bank_warnings.into_iter().chain(card_warnings).collect(),
    }))
}
