use anyhow::anyhow;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use fses_core::AppError;
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body extractor that also runs the payload's `Validate` rules.
///
/// Every rejection is a 400. A missing required field and a failed rule both
/// come back as a field map, the same shape a constraint violation from the
/// database produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|s| s.split('`').next())
}

/// Splits a path-prefixed serde message such as
/// `program: unknown variant `BSC`, expected ...` into the top-level field and
/// the message without its trailing position.
fn invalid_field(message: &str) -> Option<(&str, &str)> {
    let (_, rest) = message.split_once("target type: ")?;
    let (path, detail) = rest.split_once(": ")?;
    let field = path.split(['.', '[']).next()?;

    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let detail = detail.rsplit_once(" at line ").map_or(detail, |(d, _)| d);
    Some((field, detail))
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request(anyhow!(
            "Missing 'Content-Type: application/json' header"
        ));
    }

    let message = rejection.body_text();

    if let Some(field) = missing_field(&message) {
        return AppError::field(field, "This field is required.");
    }

    if let Some((field, detail)) = invalid_field(&message) {
        return AppError::field(field, format!("Invalid value: {detail}."));
    }

    if message.contains("invalid type")
        || message.contains("unknown variant")
        || message.contains("invalid value")
    {
        return AppError::bad_request(anyhow!("Invalid field type in request"));
    }

    AppError::bad_request(anyhow!("Invalid request body"))
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}
