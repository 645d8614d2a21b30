use anyhow::anyhow;
use fses_core::AppError;
use fses_db::db_error;
use fses_models::ids::{LecturerId, UserId};
use fses_models::users::Role;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{
    CreateLecturerDto, Lecturer, UpdateLecturerDto, derive_username, provisioned_email,
};
use crate::modules::users::service::UserService;

const LECTURER_COLUMNS: &str = "id, name, department_id, title, university, staff_id";

pub struct LecturerService;

impl LecturerService {
    #[instrument(skip(db))]
    pub async fn get_lecturers(db: &PgPool) -> Result<Vec<Lecturer>, AppError> {
        sqlx::query_as::<_, Lecturer>(&format!(
            "SELECT {LECTURER_COLUMNS} FROM lecturers ORDER BY id"
        ))
        .fetch_all(db)
        .await
        .map_err(db_error)
    }

    #[instrument(skip(db))]
    pub async fn get_lecturer(db: &PgPool, id: LecturerId) -> Result<Lecturer, AppError> {
        sqlx::query_as::<_, Lecturer>(&format!(
            "SELECT {LECTURER_COLUMNS} FROM lecturers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Lecturer not found")))
    }

    /// Creates the lecturer and a SUPERVISOR account linked to it.
    ///
    /// The account's username is derived from the lecturer's name and doubles
    /// as the initial password. Both rows are written in one transaction.
    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_lecturer(
        db: &PgPool,
        dto: CreateLecturerDto,
    ) -> Result<Lecturer, AppError> {
        let username = derive_username(&dto.name)
            .ok_or_else(|| AppError::field("name", "Name must contain at least one word."))?;

        let mut tx = db.begin().await.map_err(db_error)?;

        let account = UserService::create_user(
            &mut *tx,
            &username,
            &provisioned_email(&username),
            &username,
            Role::Supervisor,
            true,
        )
        .await
        .map_err(|err| {
            let taken = err
                .fields
                .as_ref()
                .is_some_and(|fields| fields.contains_key("username"));
            if taken {
                AppError::field(
                    "name",
                    format!("An account named '{}' already exists.", username),
                )
            } else {
                err
            }
        })?;

        let lecturer = sqlx::query_as::<_, Lecturer>(&format!(
            r#"
            INSERT INTO lecturers (name, department_id, title, university, staff_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LECTURER_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(dto.department)
        .bind(dto.title)
        .bind(&dto.university)
        .bind(account.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(
            lecturer_id = %lecturer.id,
            user_id = %account.id,
            username = %account.username,
            "Lecturer created with supervisor account"
        );
        Ok(lecturer)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_lecturer(
        db: &PgPool,
        id: LecturerId,
        dto: UpdateLecturerDto,
    ) -> Result<Lecturer, AppError> {
        let existing = Self::get_lecturer(db, id).await?;

        let staff = dto.staff.unwrap_or(existing.staff);
        if let Some(user_id) = staff {
            if staff != existing.staff {
                Self::ensure_supervisor_account(db, user_id).await?;
            }
        }

        sqlx::query_as::<_, Lecturer>(&format!(
            r#"
            UPDATE lecturers
            SET name = $2, department_id = $3, title = $4, university = $5, staff_id = $6
            WHERE id = $1
            RETURNING {LECTURER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.department.unwrap_or(existing.department))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.university.unwrap_or(existing.university))
        .bind(staff)
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Lecturer not found")))
    }

    /// Deletes the lecturer. Their account is kept; student and nomination
    /// references to them are cleared.
    #[instrument(skip(db))]
    pub async fn delete_lecturer(db: &PgPool, id: LecturerId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lecturers WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Lecturer not found")));
        }

        info!(lecturer_id = %id, "Lecturer deleted");
        Ok(())
    }

    /// A lecturer's `staff` link may only point at an existing SUPERVISOR.
    async fn ensure_supervisor_account(db: &PgPool, user_id: UserId) -> Result<(), AppError> {
        let role: Option<Role> = sqlx::query_scalar("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await
            .map_err(db_error)?;

        match role {
            Some(Role::Supervisor) => Ok(()),
            Some(_) => Err(AppError::field("staff", "User must have role SUPERVISOR.")),
            None => Err(AppError::field("staff", "Referenced object does not exist.")),
        }
    }
}
