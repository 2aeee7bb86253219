use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

use crate::config::Table;
use crate::remote::models::PropertyError;

/// Description used when a record has none
pub const NO_DESCRIPTION: &str = "No Description";

lazy_static! {
    /// Remote record ids: 32 hex digits, dashed or not
    static ref RECORD_ID: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}$"
    )
    .expect("Invalid record id pattern");
}

pub fn is_record_id(id: &str) -> bool {
    RECORD_ID.is_match(id)
}

/// Transaction type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum TransactionType {
    Income,
    Expense,
    Investment,
    Transfer,
    Other,
}

/// A flat transaction built from one remote record
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Remote record id
    #[schema(example = "1a2b3c4d-0000-0000-0000-000000000000")]
    pub id: String,
    /// Transaction date, if the record has one
    pub date: Option<NaiveDate>,
    #[schema(example = "Groceries")]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(example = 450.5)]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
}

/// Property names of one source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSchema {
    pub date_field: &'static str,
    pub amount_field: &'static str,
    pub description_field: &'static str,
    /// Relation to the bank account a record belongs to
    pub relation_field: &'static str,
    pub category_field: Option<&'static str>,
    pub sub_category_field: Option<&'static str>,
}

/// Transaction tables in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ledger {
    Expenses,
    Income,
    Investments,
}

impl Ledger {
    pub const ALL: [Ledger; 3] = [Ledger::Expenses, Ledger::Income, Ledger::Investments];

    pub fn label(self) -> &'static str {
        match self {
            Ledger::Expenses => "expenses",
            Ledger::Income => "income",
            Ledger::Investments => "investments",
        }
    }

    pub fn table(self) -> Table {
        match self {
            Ledger::Expenses => Table::Expenses,
            Ledger::Income => Table::Income,
            Ledger::Investments => Table::Investments,
        }
    }

    pub fn transaction_type(self) -> TransactionType {
        match self {
            Ledger::Expenses => TransactionType::Expense,
            Ledger::Income => TransactionType::Income,
            Ledger::Investments => TransactionType::Investment,
        }
    }

    pub fn schema(self) -> SourceSchema {
        match self {
            Ledger::Expenses => SourceSchema {
                date_field: "Date",
                amount_field: "Amount",
                description_field: "Expense",
                relation_field: "Bank Account",
                category_field: Some("Category"),
                sub_category_field: Some("Sub Category"),
            },
            Ledger::Income => SourceSchema {
                date_field: "Date",
                amount_field: "Amount",
                description_field: "Description",
                relation_field: "Accounts",
                category_field: Some("Category"),
                sub_category_field: Some("Sub Category"),
            },
            Ledger::Investments => SourceSchema {
                date_field: "Investment Date",
                amount_field: "Invested Amount",
                description_field: "Description",
                relation_field: "Bank Account",
                category_field: Some("Invested Account"),
                sub_category_field: None,
            },
        }
    }

    /// Relation to the credit card a record was charged to.
    pub fn card_relation(self) -> Option<&'static str> {
        match self {
            Ledger::Expenses => Some("Credit Card"),
            Ledger::Income | Ledger::Investments => None,
        }
    }

    /// Lookup tables resolving category and sub-category references.
    pub fn category_tables(self) -> (Table, Option<Table>) {
        match self {
            Ledger::Expenses => (Table::ExpenseCategories, Some(Table::ExpenseSubCategories)),
            Ledger::Income => (Table::IncomeCategories, Some(Table::IncomeSubCategories)),
            Ledger::Investments => (Table::InvestmentAccounts, None),
        }
    }
}

/// A category as found on a record: either the name itself or a reference
/// to a row of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValue {
    Name(String),
    Reference(String),
}

/// A mapped transaction whose category names may still need resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRecord {
    pub transaction: Transaction,
    pub category: Option<CategoryValue>,
    pub sub_category: Option<CategoryValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    MissingId,
    Property(PropertyError),
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::MissingId => write!(f, "record has no id"),
            MappingError::Property(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for MappingError {}

impl From<PropertyError> for MappingError {
    fn from(err: PropertyError) -> Self {
        MappingError::Property(err)
    }
}

/// Query parameters for bank account transactions
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BankTransactionsQuery {
    /// Bank account record id
    pub bank_account_id: Option<String>,
    /// Month name or abbreviation
    #[param(example = "Feb")]
    pub month: Option<String>,
    /// 4-digit year
    #[param(example = "2024")]
    pub year: Option<String>,
}

/// Query parameters for credit card transactions
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CardTransactionsQuery {
    /// Credit card record id
    pub credit_card_id: Option<String>,
    #[param(example = "Feb")]
    pub month: Option<String>,
    #[param(example = "2024")]
    pub year: Option<String>,
}

/// Transactions for one account and month
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    /// Newest first; undated transactions last
    pub transactions: Vec<Transaction>,
    /// Sources that were skipped while building the response
    pub warnings: Vec<String>,
}
