use tracing::{info, warn};

use crate::config::Table;
use crate::errors::AppError;
use crate::remote::{Filter, RemoteError};
use crate::state::AppState;

use super::password::verify_password;
use super::session::create_session;

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Authentication against the users table
pub struct AuthService;

impl AuthService {
    /// Check credentials and return a signed session token.
    ///
    /// Unknown users and wrong passwords get the same error.
    pub async fn login(
        state: &AppState,
        username: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let users_table = state.config.tables.require(Table::Users)?;
        state.config.require_api_key()?;

        let filter = Filter::title_equals("Username", username);
        let users = state
            .source
            .query_all(users_table, Some(&filter))
            .await
            .map_err(|e| match e {
                RemoteError::MissingApiKey => AppError::from(e),
                other => AppError::InternalError(format!("User lookup failed: {other}")),
            })?;

        let Some(user) = users.first() else {
            info!(username, "Login failed: unknown user");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let stored = user.text("Password").unwrap_or_else(|e| {
            warn!(username, error = %e, "Password property has an unexpected shape");
            None
        });

        let valid = stored
            .as_deref()
            .is_some_and(|stored| verify_password(password, stored, username));
        if !valid {
            info!(username, "Login failed: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        info!(username, "Login succeeded");
        create_session(username, &state.config.session_secret)
    }
}
