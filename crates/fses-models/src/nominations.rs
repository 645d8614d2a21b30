//! Nomination models, DTOs, and the rules that operate on a single nomination.
//!
//! A nomination names up to three examiners and a chairperson for a student's
//! evaluation. Its [`NominationStatus`] is derived from which of those slots are
//! filled. Once `is_locked` is set the panel is final: content edits are refused
//! until someone allowed to lock unlocks it again.
//!
//! The chairperson must be a UTM lecturer of Associate Professor rank or above,
//! a Professor whenever the supervisor or an examiner is one, and independent of
//! the student's supervision and examination. A lecturer chairs at most
//! [`MAX_CHAIRS_PER_DEPARTMENT`] nominations within one department.

use fses_core::FieldErrors;
use fses_core::serde::deserialize_nullable;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{LecturerId, NominationId, StudentId};
use crate::lecturers::Title;

const EXAMINER_FIELDS: [&str; 3] = ["examiner1", "examiner2", "examiner3"];

pub const MAX_CHAIRS_PER_DEPARTMENT: i64 = 4;

/// Chairpersons are drawn from this university only.
pub const CHAIR_UNIVERSITY: &str = "UTM";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Nomination {
    pub id: NominationId,
    #[sqlx(rename = "student_id")]
    pub student: StudentId,
    #[sqlx(rename = "examiner1_id")]
    pub examiner1: Option<LecturerId>,
    #[sqlx(rename = "examiner2_id")]
    pub examiner2: Option<LecturerId>,
    #[sqlx(rename = "examiner3_id")]
    pub examiner3: Option<LecturerId>,
    pub research_title: Option<String>,
    pub is_locked: bool,
    #[sqlx(rename = "chairperson_id")]
    pub chairperson: Option<LecturerId>,
}

/// Progress of a nomination through panel assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NominationStatus {
    PendingExaminerNomination,
    PendingChairAssignment,
    ChairAssigned,
}

impl Nomination {
    pub fn examiners(&self) -> [Option<LecturerId>; 3] {
        [self.examiner1, self.examiner2, self.examiner3]
    }

    pub fn status(&self) -> NominationStatus {
        if self.examiners().iter().any(Option::is_none) {
            NominationStatus::PendingExaminerNomination
        } else if self.chairperson.is_none() {
            NominationStatus::PendingChairAssignment
        } else {
            NominationStatus::ChairAssigned
        }
    }

    /// True when `other` differs from `self` in anything except `is_locked`.
    pub fn content_differs(&self, other: &Nomination) -> bool {
        self.student != other.student
            || self.examiners() != other.examiners()
            || self.research_title != other.research_title
            || self.chairperson != other.chairperson
    }
}

/// Representation returned by every nomination endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NominationView {
    #[serde(flatten)]
    pub nomination: Nomination,
    pub status: NominationStatus,
}

impl From<Nomination> for NominationView {
    fn from(nomination: Nomination) -> Self {
        let status = nomination.status();
        Self { nomination, status }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNominationDto {
    pub student: StudentId,
    #[serde(default)]
    pub examiner1: Option<LecturerId>,
    #[serde(default)]
    pub examiner2: Option<LecturerId>,
    #[serde(default)]
    pub examiner3: Option<LecturerId>,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub research_title: Option<String>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub chairperson: Option<LecturerId>,
}

impl CreateNominationDto {
    pub fn examiners(&self) -> [Option<LecturerId>; 3] {
        [self.examiner1, self.examiner2, self.examiner3]
    }
}

/// Partial update. An explicit `null` clears an examiner, the chairperson, or
/// the research title.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateNominationDto {
    pub student: Option<StudentId>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub examiner1: Option<Option<LecturerId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub examiner2: Option<Option<LecturerId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub examiner3: Option<Option<LecturerId>>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[validate(length(max = 150))]
    #[schema(value_type = Option<String>, nullable)]
    pub research_title: Option<Option<String>>,
    pub is_locked: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<i64>, nullable)]
    pub chairperson: Option<Option<LecturerId>>,
}

impl UpdateNominationDto {
    /// The nomination as it would be after this update.
    pub fn apply(&self, current: &Nomination) -> Nomination {
        Nomination {
            id: current.id,
            student: self.student.unwrap_or(current.student),
            examiner1: self.examiner1.unwrap_or(current.examiner1),
            examiner2: self.examiner2.unwrap_or(current.examiner2),
            examiner3: self.examiner3.unwrap_or(current.examiner3),
            research_title: self
                .research_title
                .clone()
                .unwrap_or_else(|| current.research_title.clone()),
            is_locked: self.is_locked.unwrap_or(current.is_locked),
            chairperson: self.chairperson.unwrap_or(current.chairperson),
        }
    }
}

/// Checks the examiner slots of a panel.
///
/// Filled slots must name different lecturers, and none may be the student's
/// own supervisor. Returns the offending slots keyed by field name; empty when
/// the panel is acceptable.
pub fn examiner_conflicts(
    examiners: [Option<LecturerId>; 3],
    supervisor: Option<LecturerId>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for (idx, examiner) in examiners.iter().enumerate() {
        let Some(examiner) = examiner else { continue };

        if Some(*examiner) == supervisor {
            errors
                .entry(EXAMINER_FIELDS[idx].to_string())
                .or_default()
                .push("Examiner cannot be the student's supervisor.".to_string());
        }

        if examiners[..idx].contains(&Some(*examiner)) {
            errors
                .entry(EXAMINER_FIELDS[idx].to_string())
                .or_default()
                .push("Lecturer is already an examiner on this nomination.".to_string());
        }
    }

    errors
}

/// The parts of a lecturer the chairperson rules look at.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PanelMember {
    pub id: LecturerId,
    pub title: Title,
    pub university: String,
}

/// Who already sits on a student's panel besides the chairperson.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    pub supervisor: Option<PanelMember>,
    pub co_supervisor: Option<LecturerId>,
    pub examiners: Vec<PanelMember>,
}

/// Checks a proposed chairperson against the rest of the panel.
///
/// `chaired_in_department` counts the other nominations in the student's
/// department that `chair` already chairs. Violations are reported under
/// `chairperson`; empty when the chair is eligible.
pub fn chairperson_conflicts(
    chair: &PanelMember,
    panel: &Panel,
    chaired_in_department: i64,
) -> FieldErrors {
    let mut messages = Vec::new();

    if chair.title == Title::Doctor {
        messages.push("Chairperson must be at least an Associate Professor.".to_string());
    }

    let professor_on_panel = panel
        .supervisor
        .iter()
        .chain(&panel.examiners)
        .any(|member| member.title == Title::Professor);
    if professor_on_panel && chair.title != Title::Professor {
        messages.push(
            "Chairperson must be a Professor when the supervisor or an examiner is a Professor."
                .to_string(),
        );
    }

    if panel.supervisor.as_ref().map(|s| s.id) == Some(chair.id) {
        messages.push("Chairperson cannot be the student's supervisor.".to_string());
    }
    if panel.co_supervisor == Some(chair.id) {
        messages.push("Chairperson cannot be the student's co-supervisor.".to_string());
    }
    if panel.examiners.iter().any(|e| e.id == chair.id) {
        messages.push("Chairperson cannot also be an examiner on this nomination.".to_string());
    }

    if !chair.university.trim().eq_ignore_ascii_case(CHAIR_UNIVERSITY) {
        messages.push(format!("Chairperson must be from {CHAIR_UNIVERSITY}."));
    }

    if chaired_in_department >= MAX_CHAIRS_PER_DEPARTMENT {
        messages.push(format!(
            "Lecturer already chairs {MAX_CHAIRS_PER_DEPARTMENT} nominations in this department."
        ));
    }

    let mut errors = FieldErrors::new();
    if !messages.is_empty() {
        errors.insert("chairperson".to_string(), messages);
    }
    errors
}

/// Assignment count for one lecturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkloadEntry {
    #[sqlx(rename = "lecturer_id")]
    pub lecturer: LecturerId,
    pub name: String,
    pub count: i64,
}

/// Examiner and chairperson workload across visible nominations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WorkloadReport {
    pub examiners: Vec<WorkloadEntry>,
    pub chairpersons: Vec<WorkloadEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nomination() -> Nomination {
        Nomination {
            id: NominationId(1),
            student: StudentId(10),
            examiner1: None,
            examiner2: None,
            examiner3: None,
            research_title: Some("Federated learning".to_string()),
            is_locked: false,
            chairperson: None,
        }
    }

    #[test]
    fn test_status_progression() {
        let mut n = nomination();
        assert_eq!(n.status(), NominationStatus::PendingExaminerNomination);

        n.examiner1 = Some(LecturerId(1));
        n.examiner2 = Some(LecturerId(2));
        assert_eq!(n.status(), NominationStatus::PendingExaminerNomination);

        n.examiner3 = Some(LecturerId(3));
        assert_eq!(n.status(), NominationStatus::PendingChairAssignment);

        n.chairperson = Some(LecturerId(4));
        assert_eq!(n.status(), NominationStatus::ChairAssigned);
    }

    #[test]
    fn test_view_flattens_fields() {
        let view = NominationView::from(nomination());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["student"], 10);
        assert_eq!(json["examiner1"], serde_json::Value::Null);
        assert_eq!(json["status"], "PENDING_EXAMINER_NOMINATION");
    }

    #[test]
    fn test_apply_keeps_absent_and_clears_null() {
        let mut current = nomination();
        current.examiner1 = Some(LecturerId(1));
        current.chairperson = Some(LecturerId(9));

        let dto: UpdateNominationDto =
            serde_json::from_str(r#"{"examiner2":2,"chairperson":null}"#).unwrap();
        let next = dto.apply(&current);

        assert_eq!(next.examiner1, Some(LecturerId(1)));
        assert_eq!(next.examiner2, Some(LecturerId(2)));
        assert_eq!(next.chairperson, None);
        assert_eq!(next.research_title, current.research_title);
        assert!(current.content_differs(&next));
    }

    #[test]
    fn test_lock_only_change_is_not_content() {
        let current = nomination();
        let dto: UpdateNominationDto = serde_json::from_str(r#"{"is_locked":true}"#).unwrap();
        let next = dto.apply(&current);
        assert!(next.is_locked);
        assert!(!current.content_differs(&next));
    }

    #[test]
    fn test_resending_same_values_is_not_content() {
        let current = nomination();
        let dto: UpdateNominationDto = serde_json::from_str(
            r#"{"student":10,"examiner1":null,"research_title":"Federated learning","is_locked":false}"#,
        )
        .unwrap();
        assert!(!current.content_differs(&dto.apply(&current)));
    }

    #[test]
    fn test_examiner_conflicts_clean_panel() {
        let errors = examiner_conflicts(
            [Some(LecturerId(1)), Some(LecturerId(2)), None],
            Some(LecturerId(7)),
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_examiner_conflicts_supervisor_and_duplicate() {
        let errors = examiner_conflicts(
            [Some(LecturerId(7)), Some(LecturerId(2)), Some(LecturerId(2))],
            Some(LecturerId(7)),
        );
        assert_eq!(errors.len(), 2);
        assert!(errors["examiner1"][0].contains("supervisor"));
        assert!(errors["examiner3"][0].contains("already an examiner"));
        assert!(!errors.contains_key("examiner2"));
    }

    fn member(id: i64, title: Title) -> PanelMember {
        PanelMember {
            id: LecturerId(id),
            title,
            university: "UTM".to_string(),
        }
    }

    fn doctor_panel() -> Panel {
        Panel {
            supervisor: Some(member(1, Title::Doctor)),
            co_supervisor: Some(LecturerId(2)),
            examiners: vec![member(3, Title::Doctor), member(4, Title::AssociateProfessor)],
        }
    }

    fn chair_messages(chair: &PanelMember, panel: &Panel, chaired: i64) -> Vec<String> {
        chairperson_conflicts(chair, panel, chaired)
            .remove("chairperson")
            .unwrap_or_default()
    }

    #[test]
    fn test_chair_eligible() {
        let chair = member(9, Title::AssociateProfessor);
        assert!(chairperson_conflicts(&chair, &doctor_panel(), 3).is_empty());
    }

    #[test]
    fn test_chair_must_be_associate_or_above() {
        let messages = chair_messages(&member(9, Title::Doctor), &doctor_panel(), 0);
        assert_eq!(messages, ["Chairperson must be at least an Associate Professor."]);
    }

    #[test]
    fn test_chair_must_be_professor_when_panel_has_one() {
        let mut panel = doctor_panel();
        panel.examiners.push(member(5, Title::Professor));
        let messages = chair_messages(&member(9, Title::AssociateProfessor), &panel, 0);
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Chairperson must be a Professor"));
        assert!(chair_messages(&member(9, Title::Professor), &panel, 0).is_empty());

        let mut panel = doctor_panel();
        panel.supervisor = Some(member(1, Title::Professor));
        assert_eq!(chair_messages(&member(9, Title::AssociateProfessor), &panel, 0).len(), 1);
    }

    #[test]
    fn test_chair_must_be_independent() {
        let panel = Panel {
            supervisor: Some(member(1, Title::AssociateProfessor)),
            ..doctor_panel()
        };
        assert_eq!(
            chair_messages(&member(1, Title::AssociateProfessor), &panel, 0),
            ["Chairperson cannot be the student's supervisor."]
        );
        assert_eq!(
            chair_messages(&member(2, Title::AssociateProfessor), &panel, 0),
            ["Chairperson cannot be the student's co-supervisor."]
        );
        assert_eq!(
            chair_messages(&member(4, Title::AssociateProfessor), &panel, 0),
            ["Chairperson cannot also be an examiner on this nomination."]
        );
    }

    #[test]
    fn test_chair_must_be_from_utm() {
        let mut chair = member(9, Title::Professor);
        chair.university = " utm ".to_string();
        assert!(chair_messages(&chair, &doctor_panel(), 0).is_empty());

        chair.university = "UM".to_string();
        assert_eq!(chair_messages(&chair, &doctor_panel(), 0), ["Chairperson must be from UTM."]);
    }

    #[test]
    fn test_chair_limit_per_department() {
        let chair = member(9, Title::Professor);
        assert!(chair_messages(&chair, &doctor_panel(), MAX_CHAIRS_PER_DEPARTMENT - 1).is_empty());
        assert_eq!(
            chair_messages(&chair, &doctor_panel(), MAX_CHAIRS_PER_DEPARTMENT),
            ["Lecturer already chairs 4 nominations in this department."]
        );
    }

    #[test]
    fn test_research_title_limit() {
        let dto: CreateNominationDto = serde_json::from_str(&format!(
            r#"{{"student":1,"research_title":"{}"}}"#,
            "t".repeat(151)
        ))
        .unwrap();
        assert!(dto.validate().is_err());
    }
}
