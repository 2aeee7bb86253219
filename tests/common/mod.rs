#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::{json, Value};

use finboard::account::{bank_details, credit_card_details, financial_details};
use finboard::auth::{create_session, login, logout, user, SESSION_COOKIE};
use finboard::config::{AppConfig, Table};
use finboard::remote::{Filter, Page, QueryResponse, RemoteError, RemoteQuery};
use finboard::state::AppState;
use finboard::summary::{monthly_expenses, monthly_income, monthly_investments, yearly_summary};
use finboard::transaction::{bank_transactions, credit_card_transactions};

pub const SESSION_SECRET: &str = "test_session_secret_for_integration_tests";
pub const BANK_ID: &str = "aaaaaaaa-0000-0000-0000-000000000001";
pub const OTHER_BANK_ID: &str = "aaaaaaaa-0000-0000-0000-000000000002";
pub const CARD_ID: &str = "cccccccc-0000-0000-0000-000000000001";

/// Database id the test configuration uses for `table`.
pub fn table_id(table: Table) -> String {
    format!("db-{}", table.env_key().to_lowercase())
}

// ============================================================================
// In-memory remote source
// ============================================================================

/// Remote source backed by in-memory tables.
///
/// Queries honour the same filters the real API does, are served in pages of
/// `page_size` records, and can be slowed down or made to fail per table.
pub struct FakeSource {
    tables: Mutex<HashMap<String, Vec<Page>>>,
    failing: Mutex<HashSet<String>>,
    query_calls: Mutex<HashMap<String, usize>>,
    retrieve_calls: Mutex<usize>,
    page_size: usize,
    delay: Option<Duration>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::with_options(100, None)
    }

    pub fn with_options(page_size: usize, delay: Option<Duration>) -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
            query_calls: Mutex::new(HashMap::new()),
            retrieve_calls: Mutex::new(0),
            page_size,
            delay,
        }
    }

    pub fn insert(&self, table: Table, page: Page) {
        self.tables
            .lock()
            .unwrap()
            .entry(table_id(table))
            .or_default()
            .push(page);
    }

    pub fn fail(&self, table: Table) {
        self.failing.lock().unwrap().insert(table_id(table));
    }

    /// Number of page requests made against `table`.
    pub fn query_count(&self, table: Table) -> usize {
        self.query_calls
            .lock()
            .unwrap()
            .get(&table_id(table))
            .copied()
            .unwrap_or(0)
    }

    pub fn retrieve_count(&self) -> usize {
        *self.retrieve_calls.lock().unwrap()
    }

    fn matches(page: &Page, filter: &Filter) -> bool {
        match filter {
            Filter::And(clauses) => clauses.iter().all(|c| Self::matches(page, c)),
            Filter::RelationContains { property, id } => page
                .relation_ids(property)
                .map(|ids| ids.contains(id))
                .unwrap_or(false),
            Filter::DateOnOrAfter { property, date } => {
                matches!(page.date(property), Ok(Some(d)) if d >= *date)
            }
            Filter::DateOnOrBefore { property, date } => {
                matches!(page.date(property), Ok(Some(d)) if d <= *date)
            }
            Filter::TitleEquals { property, value } => {
                matches!(page.text(property), Ok(Some(ref t)) if t == value)
            }
        }
    }
}

#[async_trait]
impl RemoteQuery for FakeSource {
    async fn query_page(
        &self,
        database_id: &str,
        filter: Option<&Filter>,
        start_cursor: Option<&str>,
    ) -> Result<QueryResponse, RemoteError> {
        *self
            .query_calls
            .lock()
            .unwrap()
            .entry(database_id.to_string())
            .or_default() += 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(database_id) {
            return Err(RemoteError::Status {
                status: 502,
                body: "bad gateway".to_string(),
            });
        }

        let matching: Vec<Page> = self
            .tables
            .lock()
            .unwrap()
            .get(database_id)
            .map(|pages| {
                pages
                    .iter()
                    .filter(|page| filter.map_or(true, |f| Self::matches(page, f)))
                    .cloned()
                    .collect()
            })
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                body: format!("no database {database_id}"),
            })?;

        let offset: usize = start_cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (offset + self.page_size).min(matching.len());
        let has_more = end < matching.len();

        Ok(QueryResponse {
            results: matching[offset.min(end)..end].to_vec(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }

    async fn retrieve_page(&self, page_id: &str) -> Result<Page, RemoteError> {
        *self.retrieve_calls.lock().unwrap() += 1;
        self.tables
            .lock()
            .unwrap()
            .values()
            .flatten()
            .find(|page| page.id == page_id)
            .cloned()
            .ok_or_else(|| RemoteError::Status {
                status: 404,
                body: format!("no page {page_id}"),
            })
    }
}

// ============================================================================
// Record builders
// ============================================================================

pub fn page(id: &str, properties: Value) -> Page {
    serde_json::from_value(json!({ "id": id, "properties": properties })).unwrap()
}

pub fn title(text: &str) -> Value {
    json!({"type": "title", "title": [{"plain_text": text}]})
}

pub fn rich_text(text: &str) -> Value {
    json!({"type": "rich_text", "rich_text": [{"plain_text": text}]})
}

pub fn number(value: f64) -> Value {
    json!({"type": "number", "number": value})
}

pub fn formula(value: f64) -> Value {
    json!({"type": "formula", "formula": {"type": "number", "number": value}})
}

pub fn date(value: &str) -> Value {
    json!({"type": "date", "date": {"start": value}})
}

pub fn relation(ids: &[&str]) -> Value {
    json!({"type": "relation", "relation": ids.iter().map(|id| json!({"id": id})).collect::<Vec<_>>()})
}

pub fn expense(
    id: &str,
    on: Option<&str>,
    amount: f64,
    bank: &str,
    category: Option<&str>,
    sub_category: Option<&str>,
) -> Page {
    let mut props = json!({
        "Expense": title(&format!("expense {id}")),
        "Amount": number(amount),
        "Bank Account": relation(&[bank]),
        "Category": relation(&category.into_iter().collect::<Vec<_>>()),
        "Sub Category": relation(&sub_category.into_iter().collect::<Vec<_>>()),
    });
    if let Some(on) = on {
        props["Date"] = date(on);
    }
    page(id, props)
}

pub fn income(id: &str, on: &str, amount: f64, bank: &str, category: Option<&str>) -> Page {
    page(
        id,
        json!({
            "Description": title(&format!("income {id}")),
            "Date": date(on),
            "Amount": number(amount),
            "Accounts": relation(&[bank]),
            "Category": relation(&category.into_iter().collect::<Vec<_>>()),
            "Sub Category": relation(&[]),
        }),
    )
}

pub fn investment(id: &str, on: &str, amount: f64, bank: &str, account: Option<&str>) -> Page {
    page(
        id,
        json!({
            "Description": title(&format!("investment {id}")),
            "Investment Date": date(on),
            "Invested Amount": number(amount),
            "Bank Account": relation(&[bank]),
            "Invested Account": relation(&account.into_iter().collect::<Vec<_>>()),
        }),
    )
}

/// A row of a lookup table with its display name in `property`.
pub fn lookup(id: &str, property: &str, name: &str) -> Page {
    page(id, json!({ property: title(name) }))
}

// ============================================================================
// Test application
// ============================================================================

pub struct TestApp {
    pub source: Arc<FakeSource>,
    pub state: web::Data<AppState>,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
    cookies: Vec<Cookie<'static>>,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }
}

impl TestApp {
    /// App with every table configured, an API key and the default policy.
    pub fn new() -> Self {
        Self::with(FakeSource::new(), &[])
    }

    /// App over `source`; `overrides` replace configuration values and an
    /// empty value unsets the key.
    pub fn with(source: FakeSource, overrides: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = Table::ALL
            .into_iter()
            .map(|table| (table.env_key().to_string(), table_id(table)))
            .collect();
        env.insert("NOTION_API_KEY".to_string(), "secret_test_key".to_string());
        env.insert("SESSION_SECRET".to_string(), SESSION_SECRET.to_string());
        for (key, value) in overrides {
            env.insert(key.to_string(), value.to_string());
        }

        let config = AppConfig::from_lookup(|key| env.get(key).cloned())
            .expect("Test configuration should be valid");
        let source = Arc::new(source);
        let state = web::Data::new(AppState::new(config, source.clone()));

        TestApp { source, state }
    }

    pub fn session_cookie(&self) -> Cookie<'static> {
        let token = create_session("tester", &self.state.config.session_secret)
            .expect("Should sign session");
        Cookie::new(SESSION_COOKIE, token)
    }

    async fn call(&self, req: test::TestRequest) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(self.state.clone())
                .service(login)
                .service(logout)
                .service(user)
                .service(bank_details)
                .service(credit_card_details)
                .service(financial_details)
                .service(bank_transactions)
                .service(credit_card_transactions)
                .service(monthly_expenses)
                .service(monthly_income)
                .service(monthly_investments)
                .service(yearly_summary),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let cookies = resp
            .response()
            .cookies()
            .map(|c| c.into_owned())
            .collect();
        let body = test::read_body(resp).await;

        TestResponse {
            status,
            body,
            cookies,
        }
    }

    /// GET as a logged-in user.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.call(
            test::TestRequest::get()
                .uri(path)
                .cookie(self.session_cookie()),
        )
        .await
    }

    /// GET without a session cookie.
    pub async fn get_anonymous(&self, path: &str) -> TestResponse {
        self.call(test::TestRequest::get().uri(path)).await
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: Cookie<'static>) -> TestResponse {
        self.call(test::TestRequest::get().uri(path).cookie(cookie))
            .await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> TestResponse {
        self.call(test::TestRequest::post().uri(path).set_json(payload))
            .await
    }
}
