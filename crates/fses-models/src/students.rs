//! Student models and DTOs.

use fses_core::serde::deserialize_nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{DepartmentId, LecturerId, StudentId};

/// Postgraduate programme. Stored as the Postgres enum `study_program`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "study_program", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Program {
    #[default]
    Phd,
    Mphil,
    Dse,
}

/// Whether this is the student's first evaluation or a repeat.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "evaluation_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationType {
    #[default]
    FirstEvaluation,
    ReEvaluation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    #[sqlx(rename = "supervisor_id")]
    pub supervisor: Option<LecturerId>,
    #[sqlx(rename = "co_supervisor_id")]
    pub co_supervisor: Option<LecturerId>,
    pub program: Program,
    pub semester: i16,
    pub evaluation_type: EvaluationType,
    #[sqlx(rename = "department_id")]
    pub department: DepartmentId,
}

fn default_semester() -> i16 {
    1
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    pub supervisor: Option<LecturerId>,
    #[serde(default)]
    pub co_supervisor: Option<LecturerId>,
    #[serde(default)]
    pub program: Program,
    #[serde(default = "default_semester")]
    #[validate(range(min = 0))]
    pub semester: i16,
    #[serde(default)]
    pub evaluation_type: EvaluationType,
    pub department: DepartmentId,
}

/// Partial update. `supervisor: null` / `co_supervisor: null` clear the link.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub supervisor: Option<Option<LecturerId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub co_supervisor: Option<Option<LecturerId>>,
    pub program: Option<Program>,
    #[validate(range(min = 0))]
    pub semester: Option<i16>,
    pub evaluation_type: Option<EvaluationType>,
    pub department: Option<DepartmentId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_student_defaults() {
        let dto: CreateStudentDto =
            serde_json::from_str(r#"{"name":"AHMAD FAIRUZ BIN ALI","department":1}"#).unwrap();
        assert_eq!(dto.program, Program::Phd);
        assert_eq!(dto.semester, 1);
        assert_eq!(dto.evaluation_type, EvaluationType::FirstEvaluation);
        assert_eq!(dto.supervisor, None);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_student_semester_is_non_negative() {
        let dto: CreateStudentDto =
            serde_json::from_str(r#"{"name":"A","department":1,"semester":0}"#).unwrap();
        assert!(dto.validate().is_ok());

        let dto: CreateStudentDto =
            serde_json::from_str(r#"{"name":"A","department":1,"semester":-1}"#).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_program_and_evaluation_json_names() {
        assert_eq!(serde_json::to_string(&Program::Mphil).unwrap(), r#""MPHIL""#);
        assert_eq!(
            serde_json::to_string(&EvaluationType::ReEvaluation).unwrap(),
            r#""RE_EVALUATION""#
        );
        assert!(serde_json::from_str::<Program>(r#""MASTERS""#).is_err());
    }

    #[test]
    fn test_update_student_clears_supervisor() {
        let dto: UpdateStudentDto =
            serde_json::from_str(r#"{"supervisor":null,"semester":3}"#).unwrap();
        assert_eq!(dto.supervisor, Some(None));
        assert_eq!(dto.co_supervisor, None);
        assert_eq!(dto.semester, Some(3));
    }
}
