//! # FSES Models
//!
//! Domain models and DTOs for the FSES evaluation-nomination API.
//!
//! Database rows derive [`sqlx::FromRow`], request DTOs derive
//! [`validator::Validate`], and everything exposed over HTTP derives
//! [`utoipa::ToSchema`].
//!
//! # Modules
//!
//! - [`ids`]: Typed primary keys
//! - [`users`]: Login accounts and roles
//! - [`auth`]: Login, profile update, and reset-code DTOs
//! - [`departments`]: Departments
//! - [`lecturers`]: Lecturers and account provisioning names
//! - [`students`]: Postgraduate students
//! - [`nominations`]: Examiner panels, their status, and workload reports

pub mod auth;
pub mod departments;
pub mod ids;
pub mod lecturers;
pub mod nominations;
pub mod students;
pub mod users;

pub use auth::{
    ConfirmResetCodeRequest, LoginRequest, LoginResponse, MessageResponse, ResetCodeRequest,
    ResetPasswordRequest, UpdateUserRequest, UpdateUserResponse,
};

pub use departments::{CreateDepartmentDto, Department, UpdateDepartmentDto};

pub use ids::{DepartmentId, LecturerId, NominationId, StudentId, UserId};

pub use lecturers::{CreateLecturerDto, Lecturer, Title, UpdateLecturerDto};

pub use nominations::{
    CreateNominationDto, Nomination, NominationStatus, NominationView, Panel, PanelMember,
    UpdateNominationDto, WorkloadEntry, WorkloadReport, chairperson_conflicts,
    examiner_conflicts,
};

pub use students::{CreateStudentDto, EvaluationType, Program, Student, UpdateStudentDto};

pub use users::{CurrentUserResponse, ParseRoleError, Role, User, UserCredentials};
