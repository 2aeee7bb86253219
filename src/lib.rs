pub mod account;
pub mod auth;
pub mod category;
pub mod config;
pub mod errors;
pub mod extractors;
pub mod openapi;
pub mod period;
pub mod remote;
pub mod sort;
pub mod state;
pub mod summary;
pub mod transaction;
