use actix_web::{get, post, web, HttpResponse};
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::SessionUser;
use crate::state::AppState;

use super::models::{LoginDto, LoginResponse, LoginUser, LogoutResponse, SessionStatus};
use super::service::AuthService;
use super::session::{removal_cookie, session_cookie};

/// POST /api/auth/login - Check credentials and start a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = LoginResponse),
        (status = 400, description = "Username or password missing", body = ErrorResponse),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 429, description = "Too many login attempts"),
        (status = 500, description = "Users table not configured", body = ErrorResponse)
    )
)]
#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|_| AppError::ValidationError("Username and password are required.".to_string()))?;

    let username = body.username.trim();
    let token = AuthService::login(state.get_ref(), username, &body.password).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token, state.config.cookie_secure))
        .json(LoginResponse {
            success: true,
            user: LoginUser {
                username: username.to_string(),
            },
        }))
}

/// POST /api/auth/logout - End the session
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie removed", body = LogoutResponse)
    )
)]
#[post("/api/auth/logout")]
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(removal_cookie(state.config.cookie_secure))
        .json(LogoutResponse { success: true })
}

/// GET /api/auth/user - Report whether the caller is logged in
#[utoipa::path(
    get,
    path = "/api/auth/user",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session state", body = SessionStatus)
    )
)]
#[get("/api/auth/user")]
pub async fn user(session: Option<SessionUser>) -> HttpResponse {
    let status = match session {
        Some(session) => SessionStatus {
            is_logged_in: true,
            username: Some(session.username),
        },
        None => SessionStatus {
            is_logged_in: false,
            username: None,
        },
    };
    HttpResponse::Ok().json(status)
}
