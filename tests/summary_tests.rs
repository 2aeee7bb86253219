use std::time::Duration;

use futures::future::join_all;
use serde_json::{json, Value};

mod common;
use common::{
    expense, formula, income, investment, lookup, page, title, FakeSource, TestApp, BANK_ID,
};

use finboard::config::Table;

const FOOD: &str = "f00d0000-0000-0000-0000-000000000001";
const RENT: &str = "4e470000-0000-0000-0000-000000000002";
const GROCERIES: &str = "90ce0000-0000-0000-0000-000000000003";

fn seed_expense_lookups(source: &FakeSource) {
    source.insert(Table::ExpenseCategories, lookup(FOOD, "Category", "Food"));
    source.insert(Table::ExpenseCategories, lookup(RENT, "Category", "Rent"));
    source.insert(
        Table::ExpenseSubCategories,
        lookup(GROCERIES, "Sub Category", "Groceries"),
    );
}

fn seed_february_expenses(source: &FakeSource) {
    let rows = [
        expense("e1", Some("2024-02-01"), 100.0, BANK_ID, Some(FOOD), Some(GROCERIES)),
        expense("e2", Some("2024-02-29"), 50.0, BANK_ID, Some(FOOD), Some(GROCERIES)),
        expense("e3", Some("2024-02-03"), 500.0, BANK_ID, Some(RENT), None),
        // zero amounts are left out of the expense breakdown
        expense("e4", Some("2024-02-04"), 0.0, BANK_ID, Some(FOOD), None),
        // no category at all
        expense("e5", Some("2024-02-05"), 70.0, BANK_ID, None, None),
        // outside the month
        expense("e6", Some("2024-03-01"), 999.0, BANK_ID, Some(FOOD), Some(GROCERIES)),
    ];
    for row in rows {
        source.insert(Table::Expenses, row);
    }
}

fn rows_of(body: &Value, key: &str) -> Vec<(String, String, f64)> {
    body[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            (
                row["category"].as_str().unwrap().to_string(),
                row["subCategory"].as_str().unwrap().to_string(),
                row["totalAmount"].as_f64().unwrap(),
            )
        })
        .collect()
}

// ============================================================================
// Monthly breakdowns
// ============================================================================

#[actix_rt::test]
async fn test_monthly_expenses_grouped_by_category() {
    let source = FakeSource::new();
    seed_expense_lookups(&source);
    seed_february_expenses(&source);
    let app = TestApp::with(source, &[]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(
        rows_of(&body, "monthlyExpenses"),
        vec![
            ("Food".to_string(), "Groceries".to_string(), 150.0),
            ("Rent".to_string(), "Uncategorized".to_string(), 500.0),
        ]
    );

    let first = &body["monthlyExpenses"][0];
    assert_eq!(first["year"], 2024);
    assert_eq!(first["month"], "Feb");
    assert_eq!(first["formattedTotal"], "₹150");
    assert_eq!(body["warnings"], json!([]));
}

#[actix_rt::test]
async fn test_monthly_expenses_without_expense_table() {
    let app = TestApp::with(FakeSource::new(), &[("EXPENSE_DB_ID", "")]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json();
    assert_eq!(body["error"], "EXPENSE_DB_ID is not configured.");
    assert_eq!(body["code"], "CONFIGURATION_MISSING");
}

#[actix_rt::test]
async fn test_configuration_checked_before_parameters() {
    let app = TestApp::with(FakeSource::new(), &[("INCOME_DB_ID", "")]);

    let response = app.get("/api/monthly-income?month=Nope").await;

    assert_eq!(response.status(), 500);
    assert_eq!(response.json()["error"], "INCOME_DB_ID is not configured.");
}

#[actix_rt::test]
async fn test_monthly_expenses_invalid_month() {
    let app = TestApp::new();

    let response = app.get("/api/monthly-expenses?month=Smarch&year=2024").await;

    assert_eq!(response.status(), 400);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[actix_rt::test]
async fn test_monthly_expenses_invalid_year() {
    let app = TestApp::new();

    let response = app.get("/api/monthly-expenses?month=Feb&year=24").await;

    assert_eq!(response.status(), 400);
    assert!(response.json()["error"].as_str().unwrap().contains("24"));
}

#[actix_rt::test]
async fn test_monthly_expenses_missing_params() {
    let app = TestApp::new();

    let response = app.get("/api/monthly-expenses?month=Feb").await;

    assert_eq!(response.status(), 400);
    assert_eq!(
        response.json()["error"],
        "month and year are required query parameters."
    );
}

#[actix_rt::test]
async fn test_monthly_income_and_investments() {
    let source = FakeSource::new();
    source.insert(Table::IncomeCategories, lookup("inc-salary", "Category", "Salary"));
    source.insert(
        Table::InvestmentAccounts,
        lookup("inv-index", "Investment Account", "Index Fund"),
    );
    source.insert(
        Table::Income,
        income("i1", "2024-05-01", 4000.0, BANK_ID, Some("inc-salary")),
    );
    source.insert(
        Table::Income,
        income("i2", "2024-05-31", 1000.0, BANK_ID, Some("inc-salary")),
    );
    source.insert(
        Table::Investments,
        investment("v1", "2024-05-10", 250.0, BANK_ID, Some("inv-index")),
    );
    let app = TestApp::with(source, &[]);

    let income = app.get("/api/monthly-income?month=may&year=2024").await;
    assert_eq!(income.status(), 200);
    assert_eq!(
        rows_of(&income.json(), "monthlyIncome"),
        vec![("Salary".to_string(), "Uncategorized".to_string(), 5000.0)]
    );

    let investments = app
        .get("/api/monthly-investments?month=MAY&year=2024")
        .await;
    assert_eq!(investments.status(), 200);
    assert_eq!(
        rows_of(&investments.json(), "monthlyInvestments"),
        vec![("Index Fund".to_string(), "Uncategorized".to_string(), 250.0)]
    );
}

#[actix_rt::test]
async fn test_category_cache_loads_once_across_requests() {
    let source = FakeSource::new();
    seed_expense_lookups(&source);
    seed_february_expenses(&source);
    let app = TestApp::with(source, &[]);

    for _ in 0..3 {
        let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;
        assert_eq!(response.status(), 200);
    }

    assert_eq!(app.source.query_count(Table::Expenses), 3);
    assert_eq!(app.source.query_count(Table::ExpenseCategories), 1);
    assert_eq!(app.source.query_count(Table::ExpenseSubCategories), 1);
}

#[actix_rt::test]
async fn test_concurrent_cold_cache_loads_once() {
    let source = FakeSource::with_options(100, Some(Duration::from_millis(20)));
    seed_expense_lookups(&source);
    seed_february_expenses(&source);
    let app = TestApp::with(source, &[]);

    let responses = join_all(
        (0..5).map(|_| app.get("/api/monthly-expenses?month=Feb&year=2024")),
    )
    .await;

    let expected = rows_of(&responses[0].json(), "monthlyExpenses");
    assert_eq!(expected.len(), 2);
    for response in &responses {
        assert_eq!(response.status(), 200);
        assert_eq!(rows_of(&response.json(), "monthlyExpenses"), expected);
    }
    assert_eq!(app.source.query_count(Table::ExpenseCategories), 1);
    assert_eq!(app.source.query_count(Table::ExpenseSubCategories), 1);
}

#[actix_rt::test]
async fn test_failed_category_load_is_retried() {
    let source = FakeSource::new();
    seed_february_expenses(&source);
    // lookup tables configured but absent from the source, so loads fail
    let app = TestApp::with(source, &[]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["monthlyExpenses"], json!([]));
    assert_eq!(
        body["warnings"],
        json!(["Category names for expenses could not be loaded"])
    );

    assert_eq!(app.source.query_count(Table::ExpenseCategories), 1);
    assert_eq!(app.source.query_count(Table::ExpenseSubCategories), 1);

    app.get("/api/monthly-expenses?month=Feb&year=2024").await;
    assert_eq!(app.source.query_count(Table::ExpenseCategories), 2);
}

#[actix_rt::test]
async fn test_failed_category_load_is_not_repeated_per_record() {
    let source = FakeSource::new();
    seed_expense_lookups(&source);
    source.fail(Table::ExpenseCategories);
    for day in 1..=40 {
        source.insert(
            Table::Expenses,
            expense(
                &format!("bulk-{day}"),
                Some(&format!("2024-02-{:02}", day % 28 + 1)),
                5.0,
                BANK_ID,
                Some(FOOD),
                Some(GROCERIES),
            ),
        );
    }
    let app = TestApp::with(source, &[]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json()["warnings"],
        json!(["Category names for expenses could not be loaded"])
    );
    assert_eq!(app.source.query_count(Table::ExpenseCategories), 1);
    assert_eq!(app.source.query_count(Table::ExpenseSubCategories), 1);
}

#[actix_rt::test]
async fn test_failed_category_load_propagates() {
    let source = FakeSource::new();
    seed_february_expenses(&source);
    let app = TestApp::with(source, &[("SOURCE_ERROR_POLICY", "propagate")]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;

    assert_eq!(response.status(), 500);
    assert_eq!(response.json()["code"], "REMOTE_FETCH_FAILED");
}

#[actix_rt::test]
async fn test_unconfigured_lookup_table_retrieves_records() {
    let source = FakeSource::new();
    seed_expense_lookups(&source);
    seed_february_expenses(&source);
    let app = TestApp::with(
        source,
        &[("EXP_CATEGORY_DB_ID", ""), ("EXP_SUB_CATEGORY_DB_ID", "")],
    );

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        rows_of(&response.json(), "monthlyExpenses"),
        vec![
            ("Food".to_string(), "Groceries".to_string(), 150.0),
            ("Rent".to_string(), "Uncategorized".to_string(), 500.0),
        ]
    );
    // Food, Rent and Groceries, each fetched once
    assert_eq!(app.source.retrieve_count(), 3);

    let retrieved = app.source.retrieve_count();
    app.get("/api/monthly-expenses?month=Feb&year=2024").await;
    assert_eq!(app.source.retrieve_count(), retrieved);
}

#[actix_rt::test]
async fn test_paginated_results_are_drained() {
    let source = FakeSource::with_options(2, None);
    seed_expense_lookups(&source);
    for day in 1..=5 {
        source.insert(
            Table::Expenses,
            expense(
                &format!("p{day}"),
                Some(&format!("2024-02-0{day}")),
                10.0,
                BANK_ID,
                Some(FOOD),
                None,
            ),
        );
    }
    let app = TestApp::with(source, &[]);

    let response = app.get("/api/monthly-expenses?month=Feb&year=2024").await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        rows_of(&response.json(), "monthlyExpenses"),
        vec![("Food".to_string(), "Uncategorized".to_string(), 50.0)]
    );
    assert_eq!(app.source.query_count(Table::Expenses), 3);
}

// ============================================================================
// Yearly summary
// ============================================================================

fn seed_year(source: &FakeSource) {
    source.insert(
        Table::Expenses,
        expense("e-jan-a", Some("2024-01-05"), 100.0, BANK_ID, None, None),
    );
    source.insert(
        Table::Expenses,
        expense("e-jan-b", Some("2024-01-31"), 50.0, BANK_ID, None, None),
    );
    source.insert(
        Table::Expenses,
        expense("e-mar", Some("2024-03-15"), 30.0, BANK_ID, None, None),
    );
    source.insert(
        Table::Expenses,
        expense("e-last-year", Some("2023-12-31"), 1.0, BANK_ID, None, None),
    );
    source.insert(Table::Income, income("i-feb", "2024-02-01", 1000.0, BANK_ID, None));
    source.insert(
        Table::Investments,
        investment("v-dec", "2024-12-31", 200.0, BANK_ID, None),
    );
    source.insert(
        Table::BankAccounts,
        page("b1", json!({"Account": title("A"), "Current Balance": formula(1000.5)})),
    );
    source.insert(
        Table::BankAccounts,
        page("b2", json!({"Account": title("B"), "Current Balance": formula(250.0)})),
    );
}

#[actix_rt::test]
async fn test_yearly_summary() {
    let source = FakeSource::new();
    seed_year(&source);
    let app = TestApp::with(source, &[]);

    let response = app.get("/api/yearly-summary?year=2024").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    let months = body["summaryData"].as_array().unwrap();
    assert_eq!(months.len(), 12);
    assert_eq!(months[0]["month"], "Jan");
    assert_eq!(months[0]["expense"], 150.0);
    assert_eq!(months[1]["income"], 1000.0);
    assert_eq!(months[2]["expense"], 30.0);
    assert_eq!(months[11]["month"], "Dec");
    assert_eq!(months[11]["investment"], 200.0);
    assert_eq!(months[6], json!({"month": "Jul", "expense": 0.0, "income": 0.0, "investment": 0.0}));
    assert_eq!(body["totalBankBalance"], 1250.5);
    assert_eq!(body["warnings"], json!([]));

    // one whole-year query per ledger
    assert_eq!(app.source.query_count(Table::Expenses), 1);
    assert_eq!(app.source.query_count(Table::Income), 1);
    assert_eq!(app.source.query_count(Table::Investments), 1);
}

#[actix_rt::test]
async fn test_yearly_summary_with_missing_sources() {
    let source = FakeSource::new();
    seed_year(&source);
    source.fail(Table::BankAccounts);
    let app = TestApp::with(source, &[("INCOME_DB_ID", "")]);

    let response = app.get("/api/yearly-summary?year=2024").await;

    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["summaryData"][1]["income"], 0.0);
    assert_eq!(body["summaryData"][0]["expense"], 150.0);
    assert_eq!(body["totalBankBalance"], 0.0);
    assert_eq!(
        body["warnings"],
        json!([
            "income source is not configured",
            "bank accounts could not be loaded"
        ])
    );
}

#[actix_rt::test]
async fn test_yearly_summary_requires_year() {
    let app = TestApp::new();

    let missing = app.get("/api/yearly-summary").await;
    assert_eq!(missing.status(), 400);
    assert_eq!(missing.json()["error"], "Year is a required query parameter.");

    let invalid = app.get("/api/yearly-summary?year=twenty").await;
    assert_eq!(invalid.status(), 400);
    assert_eq!(invalid.json()["code"], "VALIDATION_ERROR");
}
