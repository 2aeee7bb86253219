use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::models::{
    BankAccount, BankAccountsResponse, CreditCard, CreditCardsResponse, FinancialDetailsResponse,
};
use crate::auth::models::{LoginDto, LoginResponse, LoginUser, LogoutResponse, SessionStatus};
use crate::auth::SESSION_COOKIE;
use crate::errors::ErrorResponse;
use crate::summary::models::{
    AggregatedRow, MonthlyExpensesResponse, MonthlyIncomeResponse, MonthlyInvestmentsResponse,
    MonthlySummary, YearlySummaryResponse,
};
use crate::transaction::models::{Transaction, TransactionType, TransactionsResponse};

/// Security scheme modifier for the session cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Signed session cookie set by /api/auth/login",
                ))),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finboard API",
        version = "1.0.0",
        description = "Personal finance dashboard over Notion databases"
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Auth", description = "Login and session management"),
        (name = "Accounts", description = "Bank accounts and credit cards"),
        (name = "Transactions", description = "Per-account transaction lists"),
        (name = "Summaries", description = "Monthly category breakdowns and yearly totals")
    ),
    paths(
        // Auth endpoints
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::user,
        // Account endpoints
        crate::account::handlers::bank_details,
        crate::account::handlers::credit_card_details,
        crate::account::handlers::financial_details,
        // Transaction endpoints
        crate::transaction::handlers::bank_transactions,
        crate::transaction::handlers::credit_card_transactions,
        // Summary endpoints
        crate::summary::handlers::monthly_expenses,
        crate::summary::handlers::monthly_income,
        crate::summary::handlers::monthly_investments,
        crate::summary::handlers::yearly_summary,
    ),
    components(
        schemas(
            ErrorResponse,
            // Auth schemas
            LoginDto,
            LoginUser,
            LoginResponse,
            LogoutResponse,
            SessionStatus,
            // Account schemas
            BankAccount,
            CreditCard,
            BankAccountsResponse,
            CreditCardsResponse,
            FinancialDetailsResponse,
            // Transaction schemas
            TransactionType,
            Transaction,
            TransactionsResponse,
            // Summary schemas
            AggregatedRow,
            MonthlyExpensesResponse,
            MonthlyIncomeResponse,
            MonthlyInvestmentsResponse,
            MonthlySummary,
            YearlySummaryResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
