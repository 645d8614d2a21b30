//! Nomination persistence and the rules that need the store: visibility,
//! locking, one nomination per student, and the panel checks that look up the
//! student's supervision and the lecturers' titles.

use anyhow::anyhow;
use fses_core::AppError;
use fses_db::db_error;
use fses_models::ids::{DepartmentId, LecturerId, NominationId, StudentId};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::{info, instrument, warn};

use super::model::{
    CreateNominationDto, Nomination, NominationView, Panel, PanelMember, UpdateNominationDto,
    WorkloadEntry, WorkloadReport, chairperson_conflicts, examiner_conflicts,
};
use crate::middleware::access::{Action, NominationScope};
use crate::middleware::auth::Caller;

const NOMINATION_COLUMNS: &str = "n.id, n.student_id, n.examiner1_id, n.examiner2_id, \
     n.examiner3_id, n.research_title, n.is_locked, n.chairperson_id";

/// `$1` is the supervisor filter from [`NominationScope::supervisor_filter`].
const VISIBLE: &str = "($1::BIGINT IS NULL OR s.supervisor_id = $1)";

/// Where a student sits: their supervision and department.
#[derive(Debug, FromRow)]
struct StudentPlacement {
    supervisor_id: Option<LecturerId>,
    co_supervisor_id: Option<LecturerId>,
    department_id: DepartmentId,
}

pub struct NominationService;

impl NominationService {
    #[instrument(skip(db))]
    pub async fn get_nominations(
        db: &PgPool,
        scope: NominationScope,
    ) -> Result<Vec<NominationView>, AppError> {
        let nominations = sqlx::query_as::<_, Nomination>(&format!(
            r#"
            SELECT {NOMINATION_COLUMNS}
            FROM nominations n
            JOIN students s ON s.id = n.student_id
            WHERE {VISIBLE}
            ORDER BY n.id
            "#
        ))
        .bind(scope.supervisor_filter())
        .fetch_all(db)
        .await
        .map_err(db_error)?;

        Ok(nominations.into_iter().map(NominationView::from).collect())
    }

    /// Nominations outside `scope` are reported as not found.
    #[instrument(skip(db))]
    pub async fn get_nomination(
        db: &PgPool,
        scope: NominationScope,
        id: NominationId,
    ) -> Result<NominationView, AppError> {
        let mut conn = db.acquire().await.map_err(db_error)?;
        Self::fetch_visible(&mut *conn, scope, id, false)
            .await
            .map(NominationView::from)
    }

    #[instrument(skip(db, caller, dto), fields(student = %dto.student))]
    pub async fn create_nomination(
        db: &PgPool,
        caller: &Caller,
        dto: CreateNominationDto,
    ) -> Result<NominationView, AppError> {
        if dto.is_locked {
            caller.authorize(Action::LockNomination)?;
        }

        let mut tx = db.begin().await.map_err(db_error)?;

        let placement =
            Self::student_placement(&mut *tx, caller.nomination_scope(), dto.student).await?;

        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM nominations WHERE student_id = $1)")
                .bind(dto.student)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;
        if taken {
            return Err(AppError::field(
                "student",
                "This student already has a nomination.",
            ));
        }

        Self::check_panel(&mut *tx, &placement, dto.examiners(), dto.chairperson, None).await?;

        let nomination = sqlx::query_as::<_, Nomination>(&format!(
            r#"
            INSERT INTO nominations AS n
                (student_id, examiner1_id, examiner2_id, examiner3_id,
                 research_title, is_locked, chairperson_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {NOMINATION_COLUMNS}
            "#
        ))
        .bind(dto.student)
        .bind(dto.examiner1)
        .bind(dto.examiner2)
        .bind(dto.examiner3)
        .bind(&dto.research_title)
        .bind(dto.is_locked)
        .bind(dto.chairperson)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(nomination_id = %nomination.id, "Nomination created");
        Ok(nomination.into())
    }

    /// Partial update.
    ///
    /// While a nomination is locked only `is_locked` itself may change, and
    /// changing it needs [`Action::LockNomination`].
    #[instrument(skip(db, caller, dto))]
    pub async fn update_nomination(
        db: &PgPool,
        caller: &Caller,
        id: NominationId,
        dto: UpdateNominationDto,
    ) -> Result<NominationView, AppError> {
        let scope = caller.nomination_scope();
        let mut tx = db.begin().await.map_err(db_error)?;

        let current = Self::fetch_visible(&mut *tx, scope, id, true).await?;
        let next = dto.apply(&current);

        if next.is_locked != current.is_locked {
            caller.authorize(Action::LockNomination)?;
        }

        let content_changed = current.content_differs(&next);

        if current.is_locked && content_changed {
            warn!(nomination_id = %id, "Edit rejected on locked nomination");
            return Err(AppError::nomination_locked());
        }

        if content_changed {
            let placement = Self::student_placement(&mut *tx, scope, next.student).await?;
            Self::check_panel(
                &mut *tx,
                &placement,
                next.examiners(),
                next.chairperson,
                Some(id),
            )
            .await?;
        }

        let updated = sqlx::query_as::<_, Nomination>(&format!(
            r#"
            UPDATE nominations AS n
            SET student_id = $2, examiner1_id = $3, examiner2_id = $4, examiner3_id = $5,
                research_title = $6, is_locked = $7, chairperson_id = $8
            WHERE n.id = $1
            RETURNING {NOMINATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(next.student)
        .bind(next.examiner1)
        .bind(next.examiner2)
        .bind(next.examiner3)
        .bind(&next.research_title)
        .bind(next.is_locked)
        .bind(next.chairperson)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        if updated.is_locked != current.is_locked {
            info!(nomination_id = %id, is_locked = updated.is_locked, "Nomination lock changed");
        }

        Ok(updated.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_nomination(
        db: &PgPool,
        scope: NominationScope,
        id: NominationId,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await.map_err(db_error)?;

        let current = Self::fetch_visible(&mut *tx, scope, id, true).await?;
        if current.is_locked {
            warn!(nomination_id = %id, "Delete rejected on locked nomination");
            return Err(AppError::nomination_locked());
        }

        sqlx::query("DELETE FROM nominations WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(nomination_id = %id, "Nomination deleted");
        Ok(())
    }

    /// Examiner and chairperson assignment counts over the visible nominations,
    /// busiest lecturer first.
    #[instrument(skip(db))]
    pub async fn get_workload(
        db: &PgPool,
        scope: NominationScope,
    ) -> Result<WorkloadReport, AppError> {
        let examiners = sqlx::query_as::<_, WorkloadEntry>(&format!(
            r#"
            SELECT l.id AS lecturer_id, l.name, COUNT(*) AS count
            FROM nominations n
            JOIN students s ON s.id = n.student_id
            CROSS JOIN LATERAL (
                VALUES (n.examiner1_id), (n.examiner2_id), (n.examiner3_id)
            ) AS e(lecturer_id)
            JOIN lecturers l ON l.id = e.lecturer_id
            WHERE {VISIBLE}
            GROUP BY l.id, l.name
            ORDER BY count DESC, l.id
            "#
        ))
        .bind(scope.supervisor_filter())
        .fetch_all(db)
        .await
        .map_err(db_error)?;

        let chairpersons = sqlx::query_as::<_, WorkloadEntry>(&format!(
            r#"
            SELECT l.id AS lecturer_id, l.name, COUNT(*) AS count
            FROM nominations n
            JOIN students s ON s.id = n.student_id
            JOIN lecturers l ON l.id = n.chairperson_id
            WHERE {VISIBLE}
            GROUP BY l.id, l.name
            ORDER BY count DESC, l.id
            "#
        ))
        .bind(scope.supervisor_filter())
        .fetch_all(db)
        .await
        .map_err(db_error)?;

        Ok(WorkloadReport {
            examiners,
            chairpersons,
        })
    }

    async fn fetch_visible(
        conn: &mut PgConnection,
        scope: NominationScope,
        id: NominationId,
        for_update: bool,
    ) -> Result<Nomination, AppError> {
        let lock = if for_update { "FOR UPDATE OF n" } else { "" };

        sqlx::query_as::<_, Nomination>(&format!(
            r#"
            SELECT {NOMINATION_COLUMNS}
            FROM nominations n
            JOIN students s ON s.id = n.student_id
            WHERE {VISIBLE} AND n.id = $2
            {lock}
            "#
        ))
        .bind(scope.supervisor_filter())
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(anyhow!("Nomination not found")))
    }

    /// Supervision and department of `student`, which must exist and be
    /// within `scope`.
    async fn student_placement(
        conn: &mut PgConnection,
        scope: NominationScope,
        student: StudentId,
    ) -> Result<StudentPlacement, AppError> {
        let placement = sqlx::query_as::<_, StudentPlacement>(
            "SELECT supervisor_id, co_supervisor_id, department_id FROM students WHERE id = $1",
        )
        .bind(student)
        .fetch_optional(conn)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::field("student", "Referenced object does not exist."))?;

        if let NominationScope::SupervisedBy(own) = scope {
            if placement.supervisor_id != Some(own) {
                return Err(AppError::field(
                    "student",
                    "You can only nominate examiners for your own students.",
                ));
            }
        }

        Ok(placement)
    }

    /// Examiner and chairperson rules for the panel a write would leave behind.
    ///
    /// `nomination` is the row being updated, left out of the chair count.
    /// Lecturer ids that do not resolve are skipped here and rejected by the
    /// foreign keys on write.
    async fn check_panel(
        conn: &mut PgConnection,
        placement: &StudentPlacement,
        examiners: [Option<LecturerId>; 3],
        chairperson: Option<LecturerId>,
        nomination: Option<NominationId>,
    ) -> Result<(), AppError> {
        let mut errors = examiner_conflicts(examiners, placement.supervisor_id);

        if let Some(chair_id) = chairperson {
            let ids: Vec<LecturerId> = examiners
                .iter()
                .flatten()
                .copied()
                .chain(placement.supervisor_id)
                .chain([chair_id])
                .collect();

            let members = sqlx::query_as::<_, PanelMember>(
                "SELECT id, title, university FROM lecturers WHERE id = ANY($1)",
            )
            .bind(&ids)
            .fetch_all(&mut *conn)
            .await
            .map_err(db_error)?;

            let find = |id: LecturerId| members.iter().find(|m| m.id == id).cloned();

            if let Some(chair) = find(chair_id) {
                let panel = Panel {
                    supervisor: placement.supervisor_id.and_then(find),
                    co_supervisor: placement.co_supervisor_id,
                    examiners: examiners.iter().flatten().filter_map(|id| find(*id)).collect(),
                };

                let chaired: i64 = sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM nominations n
                    JOIN students s ON s.id = n.student_id
                    WHERE n.chairperson_id = $1
                      AND s.department_id = $2
                      AND ($3::BIGINT IS NULL OR n.id <> $3)
                    "#,
                )
                .bind(chair_id)
                .bind(placement.department_id)
                .bind(nomination)
                .fetch_one(&mut *conn)
                .await
                .map_err(db_error)?;

                errors.extend(chairperson_conflicts(&chair, &panel, chaired));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(errors))
        }
    }
}
