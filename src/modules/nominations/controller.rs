use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use fses_core::{AppError, ErrorResponse};
use fses_models::ids::NominationId;
use tracing::instrument;

use super::model::{CreateNominationDto, NominationView, UpdateNominationDto, WorkloadReport};
use super::service::NominationService;
use crate::middleware::access::Action;
use crate::middleware::auth::Caller;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List nominations visible to the caller
///
/// Supervisors linked to a lecturer record only see nominations for students
/// they supervise. Every other caller sees all of them.
#[utoipa::path(
    get,
    path = "/api/nominations",
    responses(
        (status = 200, description = "Visible nominations", body = Vec<NominationView>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state))]
pub async fn get_nominations(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<NominationView>>, AppError> {
    let nominations =
        NominationService::get_nominations(&state.db, caller.nomination_scope()).await?;
    Ok(Json(nominations))
}

#[utoipa::path(
    post,
    path = "/api/nominations",
    request_body = CreateNominationDto,
    responses(
        (status = 201, description = "Nomination created", body = NominationView),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state, dto))]
pub async fn create_nomination(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(dto): ValidatedJson<CreateNominationDto>,
) -> Result<(StatusCode, Json<NominationView>), AppError> {
    caller.authorize(Action::EditNomination)?;
    let nomination = NominationService::create_nomination(&state.db, &caller, dto).await?;
    Ok((StatusCode::CREATED, Json(nomination)))
}

/// Examiner and chairperson counts per lecturer
#[utoipa::path(
    get,
    path = "/api/nominations/workload",
    responses(
        (status = 200, description = "Workload over visible nominations", body = WorkloadReport),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state))]
pub async fn get_workload(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<WorkloadReport>, AppError> {
    let report = NominationService::get_workload(&state.db, caller.nomination_scope()).await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/nomination/{id}",
    params(("id" = i64, Path, description = "Nomination ID")),
    responses(
        (status = 200, description = "Nomination", body = NominationView),
        (status = 404, description = "Nomination not found or not visible", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state))]
pub async fn get_nomination(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NominationId>,
) -> Result<Json<NominationView>, AppError> {
    let nomination =
        NominationService::get_nomination(&state.db, caller.nomination_scope(), id).await?;
    Ok(Json(nomination))
}

/// Update a nomination
///
/// A locked nomination only accepts a change to `is_locked`, and only from a
/// program coordinator or PGAM.
#[utoipa::path(
    put,
    path = "/api/nomination/{id}",
    params(("id" = i64, Path, description = "Nomination ID")),
    request_body = UpdateNominationDto,
    responses(
        (status = 200, description = "Nomination updated", body = NominationView),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Nomination not found or not visible", body = ErrorResponse),
        (status = 409, description = "Nomination is locked", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state, dto))]
pub async fn update_nomination(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NominationId>,
    ValidatedJson(dto): ValidatedJson<UpdateNominationDto>,
) -> Result<Json<NominationView>, AppError> {
    caller.authorize(Action::EditNomination)?;
    let nomination = NominationService::update_nomination(&state.db, &caller, id, dto).await?;
    Ok(Json(nomination))
}

#[utoipa::path(
    delete,
    path = "/api/nomination/{id}",
    params(("id" = i64, Path, description = "Nomination ID")),
    responses(
        (status = 204, description = "Nomination deleted"),
        (status = 403, description = "Role not allowed", body = ErrorResponse),
        (status = 404, description = "Nomination not found or not visible", body = ErrorResponse),
        (status = 409, description = "Nomination is locked", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = [])),
    tag = "Nominations"
)]
#[instrument(skip(state))]
pub async fn delete_nomination(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NominationId>,
) -> Result<StatusCode, AppError> {
    caller.authorize(Action::DeleteNomination)?;
    NominationService::delete_nomination(&state.db, caller.nomination_scope(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
