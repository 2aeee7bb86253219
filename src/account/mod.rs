pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{bank_details, credit_card_details, financial_details};
