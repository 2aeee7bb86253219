use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};

use crate::auth::{decode_session, SESSION_COOKIE};
use crate::errors::AppError;
use crate::state::AppState;

/// Extractor that validates the session cookie and provides the logged-in user.
pub struct SessionUser {
    pub username: String,
}

impl FromRequest for SessionUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                return err(AppError::InternalError(
                    "Application state not configured".to_string(),
                ))
            }
        };

        let token = match req.cookie(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
            _ => return err(AppError::Unauthorized("Not logged in".to_string())),
        };

        match decode_session(&token, &state.config.session_secret) {
            Ok(claims) => ok(SessionUser {
                username: claims.sub,
            }),
            Err(e) => err(e),
        }
    }
}
