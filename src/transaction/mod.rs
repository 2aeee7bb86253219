pub mod handlers;
pub mod mapper;
pub mod models;
pub mod service;

pub use handlers::{bank_transactions, credit_card_transactions};
