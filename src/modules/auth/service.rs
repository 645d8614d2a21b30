use anyhow::anyhow;
use fses_config::JwtConfig;
use fses_core::{AppError, generate_reset_code, hash_password, verify_password};
use fses_db::db_error;
use fses_models::ids::UserId;
use fses_models::users::CurrentUserResponse;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::model::{
    LoginRequest, LoginResponse, MessageResponse, UpdateUserRequest, UpdateUserResponse,
};
use crate::middleware::auth::Identity;
use crate::modules::users::service::UserService;
use crate::utils::email::EmailService;

pub struct AuthService;

impl AuthService {
    /// Checks credentials and opens a session.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = UserService::find_credentials(db, &dto.username).await? else {
            warn!("Login rejected: unknown username");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&dto.password, &user.password)? {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AppError::invalid_credentials());
        }

        let session_id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, expires_at)
            VALUES ($1, $2, NOW() + make_interval(secs => $3))
            "#,
        )
        .bind(session_id)
        .bind(user.id)
        .bind(jwt_config.session_expiry as f64)
        .execute(db)
        .await
        .map_err(db_error)?;

        let access_token = fses_auth::create_session_token(
            user.id.get(),
            session_id,
            user.role.as_str(),
            jwt_config,
        )?;

        info!(user_id = %user.id, session_id = %session_id, "User logged in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            session_id,
            access_token,
            role: user.role,
            is_first_time: user.is_first_time,
        })
    }

    #[instrument(skip(db))]
    pub async fn logout(db: &PgPool, session_id: Uuid) -> Result<MessageResponse, AppError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(session_id)
            .execute(db)
            .await
            .map_err(db_error)?;

        Ok(MessageResponse::new("Logged out successfully"))
    }

    #[instrument(skip(db))]
    pub async fn current_user(db: &PgPool, id: UserId) -> Result<CurrentUserResponse, AppError> {
        UserService::get_user(db, id).await.map(Into::into)
    }

    /// Changes username and/or password, then clears the first-login flag.
    #[instrument(skip(db, identity, dto), fields(user_id = %identity.user_id))]
    pub async fn update_user(
        db: &PgPool,
        identity: &Identity,
        dto: UpdateUserRequest,
    ) -> Result<UpdateUserResponse, AppError> {
        let user =
            UserService::update_profile(db, identity.user_id, dto.username(), dto.new_password())
                .await?;

        info!(
            username_changed = dto.username().is_some(),
            password_changed = dto.new_password().is_some(),
            "User profile updated"
        );

        Ok(UpdateUserResponse {
            message: "User updated successfully".to_string(),
            role: user.role,
            is_first_time: user.is_first_time,
        })
    }

    /// Issues a fresh reset code for the account matching `login` (username or
    /// email) and mails it. Any earlier code for the account stops working.
    #[instrument(skip(db, email_service))]
    pub async fn generate_reset_code(
        db: &PgPool,
        email_service: &EmailService,
        code_ttl: i64,
        login: &str,
    ) -> Result<MessageResponse, AppError> {
        let Some(user) = UserService::find_by_username_or_email(db, login).await? else {
            warn!("Reset code requested for unknown account");
            return Err(AppError::user_not_found());
        };

        let code = generate_reset_code();

        sqlx::query(
            r#"
            INSERT INTO password_resets (user_id, code, expires_at)
            VALUES ($1, $2, NOW() + make_interval(secs => $3))
            ON CONFLICT (user_id) DO UPDATE
            SET code = EXCLUDED.code,
                created_at = NOW(),
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(user.id)
        .bind(&code)
        .bind(code_ttl as f64)
        .execute(db)
        .await
        .map_err(db_error)?;

        email_service
            .send_reset_code(&user.email, &user.username, &code)
            .await?;

        info!(user_id = %user.id, "Password reset code issued");

        Ok(MessageResponse::new("Password reset code sent to your email"))
    }

    #[instrument(skip(db, code))]
    pub async fn confirm_reset_code(db: &PgPool, code: &str) -> Result<MessageResponse, AppError> {
        let valid: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM password_resets WHERE code = $1 AND expires_at > NOW())",
        )
        .bind(code)
        .fetch_one(db)
        .await
        .map_err(db_error)?;

        if !valid {
            warn!("Reset code rejected");
            return Err(AppError::invalid_or_expired_code());
        }

        Ok(MessageResponse::new("Valid reset code"))
    }

    /// Consumes `code`, sets the new password and signs the user out everywhere.
    #[instrument(skip(db, code, new_password))]
    pub async fn reset_password(
        db: &PgPool,
        code: &str,
        new_password: &str,
    ) -> Result<MessageResponse, AppError> {
        let hashed = hash_password(new_password)?;

        let mut tx = db.begin().await.map_err(db_error)?;

        let user_id: Option<UserId> = sqlx::query_scalar(
            "DELETE FROM password_resets WHERE code = $1 AND expires_at > NOW() RETURNING user_id",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some(user_id) = user_id else {
            warn!("Reset code rejected");
            return Err(AppError::invalid_or_expired_code());
        };

        let updated = sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(hashed)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::internal(anyhow!(
                "Reset code points at missing user {}",
                user_id
            )));
        }

        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(user_id = %user_id, "Password reset completed");

        Ok(MessageResponse::new(
            "Password reset successfully, kindly login again",
        ))
    }
}
