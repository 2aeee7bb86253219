pub mod aggregate;
pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{monthly_expenses, monthly_income, monthly_investments, yearly_summary};
