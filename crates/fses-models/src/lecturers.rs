//! Lecturer models, DTOs, and the account-provisioning naming rules.
//!
//! Creating a lecturer also creates a SUPERVISOR login for them. The username is
//! the last word of their name, lower-cased ("Dr. Ahmad Rahman" becomes `rahman`),
//! the email is `{username}@utm.my`, and the initial password is the username.

use fses_core::serde::deserialize_nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{DepartmentId, LecturerId, UserId};

/// Mail domain for auto-provisioned lecturer accounts.
pub const PROVISIONED_EMAIL_DOMAIN: &str = "utm.my";

/// Academic title. Stored as the Postgres enum `lecturer_title`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "lecturer_title", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Title {
    Professor,
    AssociateProfessor,
    #[default]
    Doctor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lecturer {
    pub id: LecturerId,
    pub name: String,
    #[sqlx(rename = "department_id")]
    pub department: DepartmentId,
    pub title: Title,
    pub university: String,
    /// Linked login account, if any. Always a SUPERVISOR account.
    #[sqlx(rename = "staff_id")]
    pub staff: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLecturerDto {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    pub department: DepartmentId,
    #[serde(default)]
    pub title: Title,
    #[validate(length(min = 1, max = 30))]
    pub university: String,
}

/// Partial update. `staff: null` unlinks the account.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateLecturerDto {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub department: Option<DepartmentId>,
    pub title: Option<Title>,
    #[validate(length(min = 1, max = 30))]
    pub university: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub staff: Option<Option<UserId>>,
}

/// Username for a lecturer's auto-provisioned account: the last
/// whitespace-separated word of `name`, lower-cased.
///
/// Returns `None` for a blank name.
pub fn derive_username(name: &str) -> Option<String> {
    name.split_whitespace().last().map(str::to_lowercase)
}

pub fn provisioned_email(username: &str) -> String {
    format!("{}@{}", username, PROVISIONED_EMAIL_DOMAIN)
}
