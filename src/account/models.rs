use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::remote::models::{Page, PropertyError};

/// A bank account row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BankAccount {
    #[schema(example = "5e6f7a8b-0000-0000-0000-000000000000")]
    pub id: String,
    #[schema(example = "Global Trust Bank (Savings)")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 600000.0)]
    pub balance: Decimal,
    /// Icon URL of the record, or an empty string
    pub logo: String,
}

impl BankAccount {
    pub const UNNAMED: &'static str = "Unnamed Account";

    pub fn from_page(page: &Page) -> Result<Self, PropertyError> {
        Ok(Self {
            id: page.id.clone(),
            name: page
                .text("Account")?
                .unwrap_or_else(|| Self::UNNAMED.to_string()),
            balance: page.number("Current Balance")?.unwrap_or(Decimal::ZERO),
            logo: logo_of(page),
        })
    }
}

/// A credit card row
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    pub id: String,
    #[schema(example = "Visa Platinum")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 15000.0)]
    pub used_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 75000.0)]
    pub total_limit: Decimal,
    pub logo: String,
}

impl CreditCard {
    pub const UNNAMED: &'static str = "Unnamed Card";

    pub fn from_page(page: &Page) -> Result<Self, PropertyError> {
        Ok(Self {
            id: page.id.clone(),
            name: page
                .text("Name")?
                .unwrap_or_else(|| Self::UNNAMED.to_string()),
            used_amount: page.number("Total Used")?.unwrap_or(Decimal::ZERO),
            total_limit: page.number("Total Limit")?.unwrap_or(Decimal::ZERO),
            logo: logo_of(page),
        })
    }
}

fn logo_of(page: &Page) -> String {
    page.icon
        .as_ref()
        .and_then(|icon| icon.url())
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountsResponse {
    pub bank_accounts: Vec<BankAccount>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardsResponse {
    pub credit_card_details: Vec<CreditCard>,
    pub warnings: Vec<String>,
}

/// Bank accounts and credit cards together
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDetailsResponse {
    pub bank_accounts: Vec<BankAccount>,
    pub credit_cards: Vec<CreditCard>,
    pub warnings: Vec<String>,
}
