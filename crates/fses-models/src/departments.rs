//! Department models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::DepartmentId;

/// An academic department. Lecturers and students belong to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_department_validation() {
        let ok = CreateDepartmentDto {
            name: "Software Engineering and Advanced Technology".to_string(),
            code: "SEAT".to_string(),
        };
        assert!(ok.validate().is_ok());

        let long_code = CreateDepartmentDto {
            name: "Dept".to_string(),
            code: "X".repeat(21),
        };
        assert!(long_code.validate().is_err());

        let empty_name = CreateDepartmentDto {
            name: String::new(),
            code: "II".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_update_department_partial() {
        let dto: UpdateDepartmentDto = serde_json::from_str(r#"{"code":"CAI"}"#).unwrap();
        assert!(dto.name.is_none());
        assert_eq!(dto.code.as_deref(), Some("CAI"));
        assert!(dto.validate().is_ok());
    }
}
