use anyhow::anyhow;
use fses_core::AppError;
use fses_db::db_error;
use fses_models::ids::DepartmentId;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};

pub struct DepartmentService;

impl DepartmentService {
    #[instrument(skip(db))]
    pub async fn get_departments(db: &PgPool) -> Result<Vec<Department>, AppError> {
        sqlx::query_as::<_, Department>("SELECT id, name, code FROM departments ORDER BY id")
            .fetch_all(db)
            .await
            .map_err(db_error)
    }

    #[instrument(skip(db))]
    pub async fn get_department(db: &PgPool, id: DepartmentId) -> Result<Department, AppError> {
        sqlx::query_as::<_, Department>("SELECT id, name, code FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_department(
        db: &PgPool,
        dto: CreateDepartmentDto,
    ) -> Result<Department, AppError> {
        let department = sqlx::query_as::<_, Department>(
            "INSERT INTO departments (name, code) VALUES ($1, $2) RETURNING id, name, code",
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .fetch_one(db)
        .await
        .map_err(db_error)?;

        info!(department_id = %department.id, code = %department.code, "Department created");
        Ok(department)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_department(
        db: &PgPool,
        id: DepartmentId,
        dto: UpdateDepartmentDto,
    ) -> Result<Department, AppError> {
        let existing = Self::get_department(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let code = dto.code.unwrap_or(existing.code);

        sqlx::query_as::<_, Department>(
            "UPDATE departments SET name = $2, code = $3 WHERE id = $1 RETURNING id, name, code",
        )
        .bind(id)
        .bind(name)
        .bind(code)
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Department not found")))
    }

    /// Deletes the department together with its lecturers and students.
    #[instrument(skip(db))]
    pub async fn delete_department(db: &PgPool, id: DepartmentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Department not found")));
        }

        info!(department_id = %id, "Department deleted");
        Ok(())
    }
}
