//! Database seeding.
//!
//! - [`reference`]: the fixed demo dataset (`populate`)
//! - [`lecturers`]: fake lecturers with provisioned accounts
//! - [`students`]: fake students assigned to existing lecturers
//!
//! `seed` needs departments to exist; run `populate` first on an empty database.

pub mod lecturers;
pub mod models;
pub mod reference;
pub mod students;

use std::time::Instant;

use fses_models::{DepartmentId, LecturerId};
use sqlx::PgPool;

pub use models::SeedConfig;
pub use reference::populate_reference_data;

/// `($1, $2, ...), ($n+1, ...)` placeholders for a multi-row `VALUES`.
pub(crate) fn values_clause(rows: usize, params_per_row: usize) -> String {
    (0..rows)
        .map(|row| {
            let params: Vec<String> = (1..=params_per_row)
                .map(|col| format!("${}", row * params_per_row + col))
                .collect();
            format!("({})", params.join(", "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Seeds fake lecturers, then fake students supervised by any lecturer in the
/// database (seeded or not).
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let departments: Vec<DepartmentId> =
        sqlx::query_scalar("SELECT id FROM departments ORDER BY id")
            .fetch_all(db)
            .await?;
    if departments.is_empty() {
        return Err("No departments found. Run `populate` first.".into());
    }

    lecturers::seed_lecturers(db, &departments, config.lecturers).await?;

    let lecturers: Vec<(LecturerId, DepartmentId)> =
        sqlx::query_as("SELECT id, department_id FROM lecturers ORDER BY id")
            .fetch_all(db)
            .await?;
    students::seed_students(db, &lecturers, config.students).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    Ok(())
}

/// Row counts removed by [`clear_all`].
#[derive(Debug, Default)]
pub struct ClearedCounts {
    pub nominations: u64,
    pub students: u64,
    pub lecturer_accounts: u64,
    pub lecturers: u64,
    pub departments: u64,
}

/// Deletes every domain row. Accounts linked to a lecturer go with it; other
/// accounts are kept.
pub async fn clear_all(db: &PgPool) -> Result<ClearedCounts, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing domain data...");

    let mut tx = db.begin().await?;
    let mut counts = ClearedCounts::default();

    counts.nominations = sqlx::query("DELETE FROM nominations")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    counts.students = sqlx::query("DELETE FROM students")
        .execute(&mut *tx)
        .await?
        .rows_affected();
    // Cascades to the linked lecturer rows.
    counts.lecturer_accounts = sqlx::query(
        "DELETE FROM users WHERE id IN (SELECT staff_id FROM lecturers WHERE staff_id IS NOT NULL)",
    )
    .execute(&mut *tx)
    .await?
    .rows_affected();
    counts.lecturers = sqlx::query("DELETE FROM lecturers")
        .execute(&mut *tx)
        .await?
        .rows_affected()
        + counts.lecturer_accounts;
    counts.departments = sqlx::query("DELETE FROM departments")
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "   ✓ Deleted {} nominations, {} students, {} lecturers ({} accounts), {} departments in {:?}",
        counts.nominations,
        counts.students,
        counts.lecturers,
        counts.lecturer_accounts,
        counts.departments,
        start_time.elapsed()
    );

    Ok(counts)
}
