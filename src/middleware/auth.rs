use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use fses_auth::verify_session_token;
use fses_core::AppError;
use fses_db::db_error;
use fses_models::ids::{LecturerId, UserId};
use fses_models::users::Role;
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use crate::state::AppState;

/// The authenticated caller of a request.
///
/// Built from the session row on every request, so a logout, a password reset
/// or a role change takes effect without waiting for the token to expire.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub role: Role,
    /// Lecturer record whose `staff` link points at this account.
    pub lecturer_id: Option<LecturerId>,
    pub session_id: Uuid,
}

/// Extractor for endpoints that require a live session.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

/// Extractor for the entity endpoints.
///
/// A request without an `Authorization` header is [`Caller::Anonymous`] when
/// anonymous access is enabled and a 401 otherwise. A header carrying a bad or
/// expired token is always a 401.
#[derive(Debug, Clone)]
pub enum Caller {
    Anonymous,
    Authenticated(Identity),
}

async fn load_identity(parts: &mut Parts, state: &AppState) -> Result<Identity, AppError> {
    let TypedHeader(Authorization(bearer)) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::unauthorized("Invalid authorization header format"))?;

    let claims = verify_session_token(bearer.token(), &state.jwt_config)?;

    let identity = sqlx::query_as::<_, Identity>(
        r#"
        SELECT u.id AS user_id, u.username, u.role, l.id AS lecturer_id, s.id AS session_id
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        LEFT JOIN lecturers l ON l.staff_id = u.id
        WHERE s.id = $1 AND s.user_id = $2 AND s.expires_at > NOW()
        "#,
    )
    .bind(claims.sid)
    .bind(claims.sub)
    .fetch_optional(&state.db)
    .await
    .map_err(db_error)?;

    identity.ok_or_else(|| {
        debug!(session_id = %claims.sid, "Session revoked or expired");
        AppError::unauthorized("Invalid or expired session")
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(header::AUTHORIZATION) {
            return Err(AppError::unauthenticated());
        }

        load_identity(parts, state).await.map(AuthUser)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.contains_key(header::AUTHORIZATION) {
            return load_identity(parts, state).await.map(Caller::Authenticated);
        }

        if state.access_config.allow_anonymous {
            Ok(Caller::Anonymous)
        } else {
            Err(AppError::unauthenticated())
        }
    }
}
