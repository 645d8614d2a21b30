use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use fses_core::ErrorResponse;
use fses_models::{
    ConfirmResetCodeRequest, CreateDepartmentDto, CreateLecturerDto, CreateNominationDto,
    CreateStudentDto, CurrentUserResponse, Department, EvaluationType, Lecturer, LoginRequest,
    LoginResponse, MessageResponse, Nomination, NominationStatus, NominationView, Program,
    ResetCodeRequest, ResetPasswordRequest, Role, Student, Title, UpdateDepartmentDto,
    UpdateLecturerDto, UpdateNominationDto, UpdateStudentDto, UpdateUserRequest,
    UpdateUserResponse, WorkloadEntry, WorkloadReport,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::get_csrf,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::current_user,
        crate::modules::auth::controller::update_user,
        crate::modules::auth::controller::generate_reset_code,
        crate::modules::auth::controller::confirm_reset_code,
        crate::modules::auth::controller::reset_password,
        crate::modules::departments::controller::get_departments,
        crate::modules::departments::controller::create_department,
        crate::modules::departments::controller::get_department,
        crate::modules::departments::controller::update_department,
        crate::modules::departments::controller::delete_department,
        crate::modules::lecturers::controller::get_lecturers,
        crate::modules::lecturers::controller::create_lecturer,
        crate::modules::lecturers::controller::get_lecturer,
        crate::modules::lecturers::controller::update_lecturer,
        crate::modules::lecturers::controller::delete_lecturer,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::nominations::controller::get_nominations,
        crate::modules::nominations::controller::create_nomination,
        crate::modules::nominations::controller::get_workload,
        crate::modules::nominations::controller::get_nomination,
        crate::modules::nominations::controller::update_nomination,
        crate::modules::nominations::controller::delete_nomination,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            LoginRequest,
            LoginResponse,
            CurrentUserResponse,
            UpdateUserRequest,
            UpdateUserResponse,
            ResetCodeRequest,
            ConfirmResetCodeRequest,
            ResetPasswordRequest,
            Role,
            Department,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            Title,
            Lecturer,
            CreateLecturerDto,
            UpdateLecturerDto,
            Program,
            EvaluationType,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            Nomination,
            NominationStatus,
            NominationView,
            CreateNominationDto,
            UpdateNominationDto,
            WorkloadEntry,
            WorkloadReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, sessions and password reset"),
        (name = "Departments", description = "Department records"),
        (name = "Lecturers", description = "Lecturer records and their supervisor accounts"),
        (name = "Students", description = "Postgraduate student records"),
        (name = "Nominations", description = "Examiner and chairperson nominations")
    ),
    info(
        title = "FSES API",
        version = "0.1.0",
        description = "Evaluation nomination administration: departments, lecturers, students and examiner panels.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
