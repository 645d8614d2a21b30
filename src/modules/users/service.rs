use fses_core::{AppError, hash_password};
use fses_db::db_error;
use fses_models::ids::UserId;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use super::model::{Role, User, UserCredentials};

const USER_COLUMNS: &str = "id, username, email, role, is_first_time";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(db_error)?
            .ok_or_else(AppError::user_not_found)
    }

    #[instrument(skip(db))]
    pub async fn find_credentials(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<UserCredentials>, AppError> {
        sqlx::query_as::<_, UserCredentials>(
            "SELECT id, username, email, password, role, is_first_time FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(db)
        .await
        .map_err(db_error)
    }

    /// Matches `login` against username first, then email.
    #[instrument(skip(db))]
    pub async fn find_by_username_or_email(
        db: &PgPool,
        login: &str,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE username = $1 OR email = $1
            ORDER BY (username = $1) DESC, id
            LIMIT 1
            "#
        ))
        .bind(login)
        .fetch_optional(db)
        .await
        .map_err(db_error)
    }

    /// Inserts an account on `conn` so callers can provision it inside their
    /// own transaction. A taken username is a `username` field error.
    #[instrument(skip(conn, password))]
    pub async fn create_user(
        conn: &mut PgConnection,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        is_first_time: bool,
    ) -> Result<User, AppError> {
        let hashed = hash_password(password)?;

        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password, role, is_first_time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(hashed)
        .bind(role)
        .bind(is_first_time)
        .fetch_one(conn)
        .await
        .map_err(db_error)
    }

    /// Applies a profile update. `is_first_time` is cleared whether or not any
    /// field changed.
    #[instrument(skip(db, new_password))]
    pub async fn update_profile(
        db: &PgPool,
        id: UserId,
        username: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<User, AppError> {
        let hashed = new_password.map(hash_password).transpose()?;

        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password = COALESCE($3, password),
                is_first_time = FALSE,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(username)
        .bind(hashed)
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(AppError::user_not_found)
    }
}
