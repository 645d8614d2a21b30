//! Fake students assigned to existing lecturers.

use std::time::Instant;

use fake::Fake;
use fake::faker::boolean::en::Boolean;
use fake::faker::name::en::{FirstName, LastName};
use fses_models::{DepartmentId, EvaluationType, LecturerId, Program, StudentId};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::StudentSeed;
use super::values_clause;

const PROGRAMS: [Program; 3] = [Program::Phd, Program::Mphil, Program::Dse];
const EVALUATIONS: [EvaluationType; 2] =
    [EvaluationType::FirstEvaluation, EvaluationType::ReEvaluation];

/// Generates `count` students. Each is supervised by a random lecturer from
/// `lecturers`, belongs to that lecturer's department, and has a distinct
/// co-supervisor about half the time.
pub fn generate_students(
    lecturers: &[(LecturerId, DepartmentId)],
    count: usize,
) -> Vec<StudentSeed> {
    if lecturers.is_empty() {
        return Vec::new();
    }

    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let (supervisor, department_id) = lecturers[(0..lecturers.len()).fake::<usize>()];

            let co_supervisor = if lecturers.len() > 1 && Boolean(50).fake::<bool>() {
                let (candidate, _) = lecturers[(0..lecturers.len()).fake::<usize>()];
                (candidate != supervisor).then_some(candidate)
            } else {
                None
            };

            StudentSeed {
                name: format!("{} {}", first_name, last_name).to_uppercase(),
                supervisor_id: Some(supervisor),
                co_supervisor_id: co_supervisor,
                program: PROGRAMS[idx % PROGRAMS.len()],
                semester: (1..7).fake::<i16>(),
                evaluation_type: EVALUATIONS[idx % EVALUATIONS.len()],
                department_id,
            }
        })
        .collect()
}

pub async fn seed_students(
    db: &PgPool,
    lecturers: &[(LecturerId, DepartmentId)],
    count: usize,
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_students(lecturers, count);
    let ids = insert_students_batch(db, &students).await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn insert_students_batch(
    db: &PgPool,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 7 params per student
    const BATCH_SIZE: usize = 800;

    let mut ids = Vec::with_capacity(students.len());
    for chunk in students.chunks(BATCH_SIZE) {
        ids.extend(insert_students_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> Result<Vec<StudentId>, Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO students (name, supervisor_id, co_supervisor_id, program, semester, evaluation_type, department_id) VALUES {} RETURNING id",
        values_clause(students.len(), 7)
    );

    let mut q = sqlx::query_scalar(&query);
    for student in students {
        q = q
            .bind(&student.name)
            .bind(student.supervisor_id)
            .bind(student.co_supervisor_id)
            .bind(student.program)
            .bind(student.semester)
            .bind(student.evaluation_type)
            .bind(student.department_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_students_follow_supervisor_department() {
        let lecturers = [
            (LecturerId(1), DepartmentId(10)),
            (LecturerId(2), DepartmentId(20)),
            (LecturerId(3), DepartmentId(10)),
        ];
        let students = generate_students(&lecturers, 30);
        assert_eq!(students.len(), 30);

        for student in &students {
            let supervisor = student.supervisor_id.unwrap();
            let (_, department) = lecturers.iter().find(|(id, _)| *id == supervisor).unwrap();
            assert_eq!(student.department_id, *department);
            assert_ne!(student.co_supervisor_id, Some(supervisor));
            assert!((1..=6).contains(&student.semester));
            assert_eq!(student.name, student.name.to_uppercase());
        }
    }

    #[test]
    fn test_no_lecturers_generates_nothing() {
        assert!(generate_students(&[], 10).is_empty());
    }
}
