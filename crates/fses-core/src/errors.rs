//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. An error carries the status code
//! it maps to, an [`anyhow::Error`] with the human-readable message, and, for
//! validation failures, a map of field name to messages.
//!
//! # Response body
//!
//! ```json
//! { "error": "Validation failed", "fields": { "name": ["This field is required."] } }
//! ```
//!
//! `fields` is omitted for every non-validation error.

use std::collections::BTreeMap;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Field name to list of messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub fields: Option<FieldErrors>,
}

/// Serialized shape of an [`AppError`], used for API documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            fields: None,
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow!(message.into()))
    }

    /// Validation failure with per-field messages (400).
    pub fn validation(fields: FieldErrors) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow!("Validation failed"),
            fields: Some(fields),
        }
    }

    /// Validation failure on a single field (400).
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        Self::validation(fields)
    }

    pub fn unauthenticated() -> Self {
        Self::unauthorized("Not authenticated")
    }

    pub fn invalid_credentials() -> Self {
        Self::bad_request(anyhow!("Invalid credentials"))
    }

    pub fn user_not_found() -> Self {
        Self::not_found(anyhow!("User not found"))
    }

    pub fn invalid_or_expired_code() -> Self {
        Self::bad_request(anyhow!("Invalid or expired reset code"))
    }

    pub fn nomination_locked() -> Self {
        Self::conflict(anyhow!("Nomination is locked"))
    }

    /// Flattens [`ValidationErrors`] from a `#[derive(Validate)]` DTO into a 400.
    pub fn from_validation(errors: &ValidationErrors) -> Self {
        Self::validation(collect_field_errors(errors, None))
    }
}

fn collect_field_errors(errors: &ValidationErrors, prefix: Option<&str>) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, kind) in errors.errors() {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| default_message(&e.code, e))
                    })
                    .collect();
                out.insert(name, messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                out.extend(collect_field_errors(inner, Some(&name)));
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    out.extend(collect_field_errors(inner, Some(&format!("{}[{}]", name, idx))));
                }
            }
        }
    }
    out
}

fn default_message(code: &str, error: &validator::ValidationError) -> String {
    match code {
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("Length must be between {} and {}.", min, max),
            (Some(min), None) => format!("Ensure this field has at least {} characters.", min),
            (None, Some(max)) => format!("Ensure this field has no more than {} characters.", max),
            (None, None) => "Invalid length.".to_string(),
        },
        "range" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("Value must be between {} and {}.", min, max),
            (Some(min), None) => format!("Ensure this value is at least {}.", min),
            (None, Some(max)) => format!("Ensure this value is at most {}.", max),
            (None, None) => "Value out of range.".to_string(),
        },
        "email" => "Enter a valid email address.".to_string(),
        other => format!("Invalid value ({}).", other),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
            fields: self.fields,
        });

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 1))]
        semester: i16,
    }

    #[test]
    fn test_validation_errors_become_field_map() {
        let payload = Payload {
            name: "too long a name".to_string(),
            semester: 0,
        };
        let errors = payload.validate().unwrap_err();
        let err = AppError::from_validation(&errors);

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let fields = err.fields.unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], vec!["Length must be between 1 and 5.".to_string()]);
        assert!(fields["semester"][0].starts_with("Ensure this value is at least"));
    }

    #[test]
    fn test_single_field_error() {
        let err = AppError::field("staff", "User must have role SUPERVISOR");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.fields.unwrap()["staff"],
            vec!["User must have role SUPERVISOR".to_string()]
        );
    }

    #[test]
    fn test_named_kinds_map_to_status() {
        assert_eq!(AppError::unauthenticated().status, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::invalid_credentials().status, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::user_not_found().status, StatusCode::NOT_FOUND);
        assert_eq!(AppError::invalid_or_expired_code().status, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::nomination_locked().status, StatusCode::CONFLICT);
        assert_eq!(AppError::forbidden("no").status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let err: AppError = anyhow!("boom").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.fields.is_none());
    }
}
