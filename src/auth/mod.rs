pub mod handlers;
pub mod models;
mod password;
mod service;
mod session;

// Re-export handlers for use in main.rs
pub use handlers::{login, logout, user};

// Re-export for the session extractor
pub use session::{create_session, decode_session, SESSION_COOKIE};

pub use password::hash_password;
