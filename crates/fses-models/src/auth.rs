//! Authentication request and response DTOs.
//!
//! Covers login, the profile update used for the forced first-login password
//! change, and the three-step reset-code flow.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::Role;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    #[schema(example = "supervisor")]
    pub username: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

/// Successful login.
///
/// `access_token` is the bearer token for later requests. `is_first_time` tells
/// the client to force a password change before anything else.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub session_id: Uuid,
    pub access_token: String,
    pub role: Role,
    pub is_first_time: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Profile update. Empty strings are treated the same as absent fields.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(length(max = 150))]
    pub username: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
}

impl UpdateUserRequest {
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.is_empty())
    }

    pub fn new_password(&self) -> Option<&str> {
        self.new_password.as_deref().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserResponse {
    pub message: String,
    pub role: Role,
    pub is_first_time: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetCodeRequest {
    #[validate(length(min = 1))]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConfirmResetCodeRequest {
    #[validate(length(min = 1))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub code: String,
    #[validate(length(min = 1))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_treats_empty_as_absent() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"username":"","new_password":"s3cret"}"#).unwrap();
        assert_eq!(req.username(), None);
        assert_eq!(req.new_password(), Some("s3cret"));

        let empty: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.username(), None);
        assert_eq!(empty.new_password(), None);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"username":"","password":"x"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_reset_password_requires_new_password() {
        let req: ResetPasswordRequest =
            serde_json::from_str(r#"{"code":"abc","new_password":""}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("new_password"));
    }

    #[test]
    fn test_login_response_shape() {
        let res = LoginResponse {
            message: "Login successful".to_string(),
            session_id: Uuid::nil(),
            access_token: "t".to_string(),
            role: Role::Pgam,
            is_first_time: true,
        };
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["role"], "PGAM");
        assert_eq!(json["is_first_time"], true);
    }
}
