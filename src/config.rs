use secrecy::{ExposeSecret, Secret};
use std::env;
use std::fmt;

use crate::errors::AppError;
use crate::remote::client::DEFAULT_BASE_URL;

/// Minimum length of the session signing secret.
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// What to do when a remote source fails while serving a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceErrorPolicy {
    /// Log, continue with no records from that source and report a warning.
    #[default]
    Degrade,
    /// Fail the whole request.
    Propagate,
}

impl SourceErrorPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "degrade" => Some(SourceErrorPolicy::Degrade),
            "propagate" => Some(SourceErrorPolicy::Propagate),
            _ => None,
        }
    }
}

/// Remote tables the dashboard reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    BankAccounts,
    CreditCards,
    Expenses,
    Income,
    Investments,
    ExpenseCategories,
    ExpenseSubCategories,
    IncomeCategories,
    IncomeSubCategories,
    InvestmentAccounts,
    Users,
}

impl Table {
    pub const ALL: [Table; 11] = [
        Table::BankAccounts,
        Table::CreditCards,
        Table::Expenses,
        Table::Income,
        Table::Investments,
        Table::ExpenseCategories,
        Table::ExpenseSubCategories,
        Table::IncomeCategories,
        Table::IncomeSubCategories,
        Table::InvestmentAccounts,
        Table::Users,
    ];

    /// Environment key holding the table's database id.
    pub fn env_key(self) -> &'static str {
        match self {
            Table::BankAccounts => "NOTION_BANK_ACCOUNTS_DB_ID",
            Table::CreditCards => "NOTION_CREDIT_CARDS_DB_ID",
            Table::Expenses => "EXPENSE_DB_ID",
            Table::Income => "INCOME_DB_ID",
            Table::Investments => "INVESTMENT_TRANS_DB_ID",
            Table::ExpenseCategories => "EXP_CATEGORY_DB_ID",
            Table::ExpenseSubCategories => "EXP_SUB_CATEGORY_DB_ID",
            Table::IncomeCategories => "INC_CATEGORY_DB_ID",
            Table::IncomeSubCategories => "INC_SUB_CATEGORY_DB_ID",
            Table::InvestmentAccounts => "INVESTMENT_ACCOUNT_DB_ID",
            Table::Users => "NOTION_USERS_DB_ID",
        }
    }
}

/// Database ids keyed by [`Table`]; unset or blank ids are absent.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    ids: Vec<(Table, String)>,
}

impl Tables {
    pub fn with(mut self, table: Table, id: impl Into<String>) -> Self {
        let id = id.into();
        self.ids.retain(|(t, _)| *t != table);
        if !id.trim().is_empty() {
            self.ids.push((table, id.trim().to_string()));
        }
        self
    }

    pub fn get(&self, table: Table) -> Option<&str> {
        self.ids
            .iter()
            .find(|(t, _)| *t == table)
            .map(|(_, id)| id.as_str())
    }

    pub fn require(&self, table: Table) -> Result<&str, AppError> {
        self.get(table)
            .ok_or_else(|| AppError::ConfigurationMissing(table.env_key().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingSessionSecret,
    SessionSecretTooShort(usize),
    InvalidValue { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingSessionSecret => write!(
                f,
                "SESSION_SECRET is not set. It must be at least {MIN_SESSION_SECRET_LEN} characters long."
            ),
            ConfigError::SessionSecretTooShort(len) => write!(
                f,
                "SESSION_SECRET is too short ({len} characters). It must be at least {MIN_SESSION_SECRET_LEN} characters long."
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{value}' for {key}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub notion_api_key: Option<Secret<String>>,
    pub notion_base_url: String,
    pub session_secret: Secret<String>,
    pub cookie_secure: bool,
    pub source_error_policy: SourceErrorPolicy,
    pub currency_symbol: String,
    pub cors_allowed_origins: String,
    pub tables: Tables,
}

impl AppConfig {
    /// Load configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_secret = non_empty("SESSION_SECRET").ok_or(ConfigError::MissingSessionSecret)?;
        if session_secret.chars().count() < MIN_SESSION_SECRET_LEN {
            return Err(ConfigError::SessionSecretTooShort(
                session_secret.chars().count(),
            ));
        }

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let source_error_policy = match non_empty("SOURCE_ERROR_POLICY") {
            Some(raw) => SourceErrorPolicy::parse(&raw).ok_or(ConfigError::InvalidValue {
                key: "SOURCE_ERROR_POLICY",
                value: raw,
            })?,
            None => SourceErrorPolicy::default(),
        };

        let cookie_secure = match non_empty("COOKIE_SECURE") {
            Some(raw) => match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "COOKIE_SECURE",
                        value: raw,
                    })
                }
            },
            None => false,
        };

        let tables = Table::ALL
            .into_iter()
            .fold(Tables::default(), |tables, table| {
                match non_empty(table.env_key()) {
                    Some(id) => tables.with(table, id),
                    None => tables,
                }
            });

        Ok(Self {
            host: non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            notion_api_key: non_empty("NOTION_API_KEY").map(Secret::new),
            notion_base_url: non_empty("NOTION_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            session_secret: Secret::new(session_secret),
            cookie_secure,
            source_error_policy,
            currency_symbol: non_empty("CURRENCY_SYMBOL").unwrap_or_else(|| "₹".to_string()),
            cors_allowed_origins: non_empty("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            tables,
        })
    }

    /// Fail with a configuration error when no API key is set.
    pub fn require_api_key(&self) -> Result<(), AppError> {
        match &self.notion_api_key {
            Some(key) if !key.expose_secret().is_empty() => Ok(()),
            _ => Err(AppError::ConfigurationMissing("NOTION_API_KEY".to_string())),
        }
    }
}
