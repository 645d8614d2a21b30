use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};
use fses_core::{AppError, ErrorResponse, generate_token, token::CSRF_TOKEN_LENGTH};
use fses_models::users::CurrentUserResponse;
use tracing::instrument;

use super::model::{
    ConfirmResetCodeRequest, LoginRequest, LoginResponse, MessageResponse, ResetCodeRequest,
    ResetPasswordRequest, UpdateUserRequest, UpdateUserResponse,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

/// One year, matching the usual CSRF cookie lifetime.
const CSRF_COOKIE_MAX_AGE: u64 = 31_449_600;

/// Set the CSRF cookie
#[utoipa::path(
    get,
    path = "/auth/csrf",
    responses(
        (status = 200, description = "Cookie set", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument]
pub async fn get_csrf() -> Result<(HeaderMap, Json<MessageResponse>), AppError> {
    let cookie = format!(
        "csrftoken={}; Path=/; Max-Age={}; SameSite=Lax",
        generate_token(CSRF_TOKEN_LENGTH),
        CSRF_COOKIE_MAX_AGE
    );

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, HeaderValue::from_str(&cookie)?);

    Ok((headers, Json(MessageResponse::new("CSRF cookie set"))))
}

/// Log in and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials or validation error", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, identity))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::logout(&state.db, identity.session_id).await?;
    Ok(Json(response))
}

/// Get the logged-in account
#[utoipa::path(
    get,
    path = "/auth/user",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(state, identity))]
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<CurrentUserResponse>, AppError> {
    let user = AuthService::current_user(&state.db, identity.user_id).await?;
    Ok(Json(user))
}

/// Change username and/or password
///
/// Also clears the first-login flag, even when neither field is supplied.
#[utoipa::path(
    post,
    path = "/auth/update",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateUserResponse),
        (status = 400, description = "Validation error or username taken", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UpdateUserResponse>, AppError> {
    let response = AuthService::update_user(&state.db, &identity, dto).await?;
    Ok(Json(response))
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/auth/generate-reset-code",
    request_body = ResetCodeRequest,
    responses(
        (status = 200, description = "Code sent", body = MessageResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Mail delivery failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn generate_reset_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let response = AuthService::generate_reset_code(
        &state.db,
        &email_service,
        state.access_config.reset_code_ttl,
        &dto.username,
    )
    .await?;
    Ok(Json(response))
}

/// Check a reset code without consuming it
#[utoipa::path(
    post,
    path = "/auth/confirm-reset-code",
    request_body = ConfirmResetCodeRequest,
    responses(
        (status = 200, description = "Code is valid", body = MessageResponse),
        (status = 400, description = "Invalid or expired code", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn confirm_reset_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ConfirmResetCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::confirm_reset_code(&state.db, &dto.code).await?;
    Ok(Json(response))
}

/// Set a new password using a reset code
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Invalid or expired code", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let response = AuthService::reset_password(&state.db, &dto.code, &dto.new_password).await?;
    Ok(Json(response))
}
