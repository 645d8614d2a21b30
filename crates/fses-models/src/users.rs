//! Login accounts and the closed set of roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

use crate::ids::UserId;

/// Account role. Stored as the Postgres enum `user_role`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    OfficeAssistant,
    Supervisor,
    ProgramCoordinator,
    Pgam,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role `{0}`; expected one of OFFICE_ASSISTANT, SUPERVISOR, PROGRAM_COORDINATOR, PGAM")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 4] = [
        Role::OfficeAssistant,
        Role::Supervisor,
        Role::ProgramCoordinator,
        Role::Pgam,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::OfficeAssistant => "OFFICE_ASSISTANT",
            Role::Supervisor => "SUPERVISOR",
            Role::ProgramCoordinator => "PROGRAM_COORDINATOR",
            Role::Pgam => "PGAM",
        }
    }

    /// Display label, as shown in the admin UI.
    pub fn label(&self) -> &'static str {
        match self {
            Role::OfficeAssistant => "Office Assistant",
            Role::Supervisor => "Supervisor",
            Role::ProgramCoordinator => "Program Coordinator",
            Role::Pgam => "PGAM",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}

/// A login account, without its password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_first_time: bool,
}

/// Account row including the bcrypt hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub is_first_time: bool,
}

/// Response for `GET /auth/user`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_first_time: bool,
}

impl From<User> for CurrentUserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            role: u.role,
            is_first_time: u.is_first_time,
        }
    }
}
