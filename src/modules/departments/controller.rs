use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use fses_core::{AppError, ErrorResponse};
use fses_models::ids::DepartmentId;
use tracing::instrument;

use super::model::{CreateDepartmentDto, Department, UpdateDepartmentDto};
use super::service::DepartmentService;
use crate::middleware::access::Action;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "All departments", body = Vec<Department>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn get_departments(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<Department>>, AppError> {
    let departments = DepartmentService::get_departments(&state.db).await?;
    Ok(Json(departments))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, dto))]
pub async fn create_department(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    caller.authorize(Action::ManageRecords)?;
    let department = DepartmentService::create_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    get,
    path = "/api/department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department", body = Department),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn get_department(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<DepartmentId>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department(&state.db, id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    put,
    path = "/api/department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, dto))]
pub async fn update_department(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<DepartmentId>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    caller.authorize(Action::ManageRecords)?;
    let department = DepartmentService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

/// Delete a department along with its lecturers and students
#[utoipa::path(
    delete,
    path = "/api/department/{id}",
    params(("id" = i64, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Departments"
)]
#[instrument(skip(state))]
pub async fn delete_department(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<DepartmentId>,
) -> Result<StatusCode, AppError> {
    caller.authorize(Action::ManageRecords)?;
    DepartmentService::delete_department(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
