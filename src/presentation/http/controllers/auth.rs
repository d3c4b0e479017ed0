// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::users::{
        ChangePasswordCommand, LoginUserCommand, LogoutCommand, RefreshTokenCommand,
        RegisterUserCommand,
    },
    dto::{AuthResultDto, TokenPairDto, UserProfileDto},
};
use crate::presentation::http::error::{ErrorResponse, HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::openapi::StatusResponse;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Email address or phone number.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutAllResponse {
    pub revoked_sessions: u64,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created and signed in.", body = AuthResultDto),
        (status = 400, description = "Invalid input.", body = ErrorResponse),
        (
            status = 409,
            description = "Email or phone number already registered.",
            body = ErrorResponse
        )
    ),
    security(()),
    tag = "Auth"
)]
pub async fn register(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RegisterRequest>,
) -> HttpResult<(StatusCode, Json<AuthResultDto>)> {
    let command = RegisterUserCommand {
        email: payload.email,
        phone_number: payload.phone_number,
        password: payload.password,
        full_name: payload.full_name,
    };

    let result = state
        .services
        .user_commands
        .register(command)
        .await
        .into_http()?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in.", body = AuthResultDto),
        (status = 401, description = "Invalid credentials.", body = ErrorResponse),
        (status = 403, description = "Account is deactivated.", body = ErrorResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn login(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<LoginRequest>,
) -> HttpResult<Json<AuthResultDto>> {
    let command = LoginUserCommand {
        identifier: payload.identifier,
        password: payload.password,
    };

    state
        .services
        .user_commands
        .login(command)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (
            status = 200,
            description = "New token pair; the presented refresh token is revoked.",
            body = TokenPairDto
        ),
        (
            status = 401,
            description = "Refresh token invalid, expired or revoked.",
            body = ErrorResponse
        )
    ),
    security(()),
    tag = "Auth"
)]
pub async fn refresh_token(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> HttpResult<Json<TokenPairDto>> {
    state
        .services
        .user_commands
        .refresh_token(RefreshTokenCommand {
            refresh_token: payload.refresh_token,
        })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Refresh token revoked.", body = StatusResponse)
    ),
    security(()),
    tag = "Auth"
)]
pub async fn logout(
    Extension(state): Extension<HttpState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> HttpResult<Json<StatusResponse>> {
    state
        .services
        .user_commands
        .logout(LogoutCommand {
            refresh_token: payload.refresh_token,
        })
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "logged_out".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout-all",
    responses(
        (
            status = 200,
            description = "Every refresh token of the caller revoked.",
            body = LogoutAllResponse
        ),
        (status = 401, description = "Missing or invalid access token.", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn logout_all(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<LogoutAllResponse>> {
    let revoked_sessions = state
        .services
        .user_commands
        .logout_all(&user)
        .await
        .into_http()?;

    Ok(Json(LogoutAllResponse { revoked_sessions }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    responses(
        (status = 200, description = "Current user.", body = UserProfileDto),
        (status = 401, description = "Missing or invalid access token.", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn profile(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
) -> HttpResult<Json<UserProfileDto>> {
    state
        .services
        .user_queries
        .get_profile(&user)
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (
            status = 200,
            description = "Password changed; all sessions signed out.",
            body = StatusResponse
        ),
        (status = 400, description = "New password rejected.", body = ErrorResponse),
        (status = 401, description = "Current password is wrong.", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn change_password(
    Extension(state): Extension<HttpState>,
    Authenticated(user): Authenticated,
    Json(payload): Json<ChangePasswordRequest>,
) -> HttpResult<Json<StatusResponse>> {
    let command = ChangePasswordCommand {
        current_password: payload.current_password,
        new_password: payload.new_password,
    };

    state
        .services
        .user_commands
        .change_password(&user, command)
        .await
        .into_http()?;

    Ok(Json(StatusResponse {
        status: "password_changed".into(),
    }))
}
