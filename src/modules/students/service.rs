use anyhow::anyhow;
use fses_core::AppError;
use fses_db::db_error;
use fses_models::ids::StudentId;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::model::{CreateStudentDto, Student, UpdateStudentDto};

const STUDENT_COLUMNS: &str =
    "id, name, supervisor_id, co_supervisor_id, program, semester, evaluation_type, department_id";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn get_students(db: &PgPool) -> Result<Vec<Student>, AppError> {
        sqlx::query_as::<_, Student>(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"))
            .fetch_all(db)
            .await
            .map_err(db_error)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students
                (name, supervisor_id, co_supervisor_id, program, semester, evaluation_type, department_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(dto.supervisor)
        .bind(dto.co_supervisor)
        .bind(dto.program)
        .bind(dto.semester)
        .bind(dto.evaluation_type)
        .bind(dto.department)
        .fetch_one(db)
        .await
        .map_err(db_error)?;

        info!(student_id = %student.id, "Student created");
        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let existing = Self::get_student(db, id).await?;

        sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET name = $2, supervisor_id = $3, co_supervisor_id = $4, program = $5,
                semester = $6, evaluation_type = $7, department_id = $8
            WHERE id = $1
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(dto.name.unwrap_or(existing.name))
        .bind(dto.supervisor.unwrap_or(existing.supervisor))
        .bind(dto.co_supervisor.unwrap_or(existing.co_supervisor))
        .bind(dto.program.unwrap_or(existing.program))
        .bind(dto.semester.unwrap_or(existing.semester))
        .bind(dto.evaluation_type.unwrap_or(existing.evaluation_type))
        .bind(dto.department.unwrap_or(existing.department))
        .fetch_optional(db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Deletes the student and their nomination.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        info!(student_id = %id, "Student deleted");
        Ok(())
    }
}
