use actix_web::{get, web, HttpResponse};

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::SessionUser;
use crate::state::AppState;
use crate::transaction::models::Ledger;

use super::models::{
    AggregatedRow, MonthlyExpensesResponse, MonthlyIncomeResponse, MonthlyInvestmentsResponse,
    PeriodQuery, YearQuery, YearlySummaryResponse,
};
use super::service::SummaryService;

/// Shared checks and work behind the three monthly breakdowns: API key, then
/// the ledger's table, then the query parameters.
async fn breakdown(
    state: &AppState,
    ledger: Ledger,
    query: &PeriodQuery,
) -> Result<(Vec<AggregatedRow>, Vec<String>), AppError> {
    state.config.require_api_key()?;
    state.config.tables.require(ledger.table())?;

    let month = query.month.as_deref().map(str::trim).unwrap_or_default();
    let year = query.year.as_deref().map(str::trim).unwrap_or_default();
    if month.is_empty() || year.is_empty() {
        return Err(AppError::ValidationError(
            "month and year are required query parameters.".to_string(),
        ));
    }

    SummaryService::monthly_breakdown(state, ledger, month, year).await
}

/// GET /api/monthly-expenses - Expense totals by category for a month
#[utoipa::path(
    get,
    path = "/api/monthly-expenses",
    tag = "Summaries",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Expense totals by category and sub-category", body = MonthlyExpensesResponse),
        (status = 400, description = "Missing or invalid month/year", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/monthly-expenses")]
pub async fn monthly_expenses(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let (monthly_expenses, warnings) = breakdown(state.get_ref(), Ledger::Expenses, &query).await?;

    Ok(HttpResponse::Ok().json(MonthlyExpensesResponse {
        monthly_expenses,
        warnings,
    }))
}

/// GET /api/monthly-income - Income totals by category for a month
#[utoipa::path(
    get,
    path = "/api/monthly-income",
    tag = "Summaries",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Income totals by category and sub-category", body = MonthlyIncomeResponse),
        (status = 400, description = "Missing or invalid month/year", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/monthly-income")]
pub async fn monthly_income(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let (monthly_income, warnings) = breakdown(state.get_ref(), Ledger::Income, &query).await?;

    Ok(HttpResponse::Ok().json(MonthlyIncomeResponse {
        monthly_income,
        warnings,
    }))
}

/// GET /api/monthly-investments - Investment totals by account for a month
#[utoipa::path(
    get,
    path = "/api/monthly-investments",
    tag = "Summaries",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Investment totals by investment account", body = MonthlyInvestmentsResponse),
        (status = 400, description = "Missing or invalid month/year", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/monthly-investments")]
pub async fn monthly_investments(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let (monthly_investments, warnings) =
        breakdown(state.get_ref(), Ledger::Investments, &query).await?;

    Ok(HttpResponse::Ok().json(MonthlyInvestmentsResponse {
        monthly_investments,
        warnings,
    }))
}

/// GET /api/yearly-summary - Monthly expense, income and investment totals for a year
#[utoipa::path(
    get,
    path = "/api/yearly-summary",
    tag = "Summaries",
    params(YearQuery),
    responses(
        (status = 200, description = "Twelve monthly totals and the total bank balance", body = YearlySummaryResponse),
        (status = 400, description = "Missing or invalid year", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 500, description = "Configuration missing or remote fetch failed", body = ErrorResponse)
    ),
    security(("session_cookie" = []))
)]
#[get("/api/yearly-summary")]
pub async fn yearly_summary(
    state: web::Data<AppState>,
    _session: SessionUser,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, AppError> {
    state.config.require_api_key()?;

    let year = query
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .ok_or_else(|| {
            AppError::ValidationError("Year is a required query parameter.".to_string())
        })?;

    let response = SummaryService::yearly(state.get_ref(), year).await?;

    Ok(HttpResponse::Ok().json(response))
}
