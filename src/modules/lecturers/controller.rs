use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use fses_core::{AppError, ErrorResponse};
use fses_models::ids::LecturerId;
use tracing::instrument;

use super::model::{CreateLecturerDto, Lecturer, UpdateLecturerDto};
use super::service::LecturerService;
use crate::middleware::access::Action;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/lecturers",
    responses(
        (status = 200, description = "All lecturers", body = Vec<Lecturer>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Lecturers"
)]
#[instrument(skip(state))]
pub async fn get_lecturers(
    State(state): State<AppState>,
    _caller: Caller,
) -> Result<Json<Vec<Lecturer>>, AppError> {
    let lecturers = LecturerService::get_lecturers(&state.db).await?;
    Ok(Json(lecturers))
}

/// Create a lecturer
///
/// Also provisions a SUPERVISOR account for them: the username is the last word
/// of the name, lower-cased, and is also the initial password.
#[utoipa::path(
    post,
    path = "/api/lecturers",
    request_body = CreateLecturerDto,
    responses(
        (status = 201, description = "Lecturer created", body = Lecturer),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Lecturers"
)]
#[instrument(skip(state, dto))]
pub async fn create_lecturer(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<CreateLecturerDto>,
) -> Result<(StatusCode, Json<Lecturer>), AppError> {
    caller.authorize(Action::ManageRecords)?;
    let lecturer = LecturerService::create_lecturer(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(lecturer)))
}

#[utoipa::path(
    get,
    path = "/api/lecturer/{id}",
    params(("id" = i64, Path, description = "Lecturer ID")),
    responses(
        (status = 200, description = "Lecturer", body = Lecturer),
        (status = 404, description = "Lecturer not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Lecturers"
)]
#[instrument(skip(state))]
pub async fn get_lecturer(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<LecturerId>,
) -> Result<Json<Lecturer>, AppError> {
    let lecturer = LecturerService::get_lecturer(&state.db, id).await?;
    Ok(Json(lecturer))
}

#[utoipa::path(
    put,
    path = "/api/lecturer/{id}",
    params(("id" = i64, Path, description = "Lecturer ID")),
    request_body = UpdateLecturerDto,
    responses(
        (status = 200, description = "Lecturer updated", body = Lecturer),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Lecturer not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Lecturers"
)]
#[instrument(skip(state, dto))]
pub async fn update_lecturer(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<LecturerId>,
    ValidatedJson(dto): ValidatedJson<UpdateLecturerDto>,
) -> Result<Json<Lecturer>, AppError> {
    caller.authorize(Action::ManageRecords)?;
    let lecturer = LecturerService::update_lecturer(&state.db, id, dto).await?;
    Ok(Json(lecturer))
}

/// Delete a lecturer
///
/// The linked account is kept. Students and nominations referring to the
/// lecturer have that reference cleared.
#[utoipa::path(
    delete,
    path = "/api/lecturer/{id}",
    params(("id" = i64, Path, description = "Lecturer ID")),
    responses(
        (status = 204, description = "Lecturer deleted"),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Lecturer not found", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Lecturers"
)]
#[instrument(skip(state))]
pub async fn delete_lecturer(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<LecturerId>,
) -> Result<StatusCode, AppError> {
    caller.authorize(Action::ManageRecords)?;
    LecturerService::delete_lecturer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
