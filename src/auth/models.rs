use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Claims carried by the signed session cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username
    pub sub: String,
    /// Session id, unique per login
    pub sid: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Request body for login
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "Username and password are required."))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(length(min = 1, message = "Username and password are required."))]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUser {
    #[schema(example = "alice")]
    pub username: String,
}

/// Returned after a successful login, alongside the session cookie
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub user: LoginUser,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Current session state
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub is_logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}
