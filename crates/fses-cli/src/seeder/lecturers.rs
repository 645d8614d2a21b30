//! Fake lecturers with auto-provisioned SUPERVISOR accounts.
//!
//! Each lecturer gets the same account the API would create for them: the
//! username is the last word of the name, the email is `{username}@utm.my`, and
//! the password is the username. Generated names whose username is already
//! taken are discarded and drawn again.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fses_models::lecturers::{derive_username, provisioned_email};
use fses_models::{DepartmentId, LecturerId, Role, Title};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};

use super::models::LecturerSeed;
use super::values_clause;

const TITLES: [Title; 3] = [Title::Professor, Title::AssociateProfessor, Title::Doctor];

/// Draws per requested lecturer before giving up on finding a free username.
const MAX_DRAWS_PER_LECTURER: usize = 20;

fn honorific(title: Title) -> &'static str {
    match title {
        Title::Professor => "Prof. Dr.",
        Title::AssociateProfessor => "AP. Dr.",
        Title::Doctor => "Dr.",
    }
}

struct LecturerDraft {
    name: String,
    department_id: DepartmentId,
    title: Title,
    username: String,
}

fn draft_lecturers(
    departments: &[DepartmentId],
    count: usize,
    taken: &mut HashSet<String>,
) -> Vec<LecturerDraft> {
    let mut drafts = Vec::with_capacity(count);
    let mut draws = 0;

    while drafts.len() < count && draws < count * MAX_DRAWS_PER_LECTURER {
        draws += 1;

        let title = TITLES[drafts.len() % TITLES.len()];
        let first_name: String = FirstName().fake();
        let last_name: String = LastName().fake();
        let name = format!("{} {} {}", honorific(title), first_name, last_name);

        let Some(username) = derive_username(&name) else {
            continue;
        };
        if !taken.insert(username.clone()) {
            continue;
        }

        drafts.push(LecturerDraft {
            name,
            department_id: departments[(0..departments.len()).fake::<usize>()],
            title,
            username,
        });
    }

    drafts
}

/// Generates `count` lecturers spread over `departments`, skipping usernames in
/// `taken`. May return fewer when the name pool runs dry.
pub fn generate_lecturers(
    departments: &[DepartmentId],
    count: usize,
    taken: &mut HashSet<String>,
) -> Result<Vec<LecturerSeed>, bcrypt::BcryptError> {
    if departments.is_empty() {
        return Ok(Vec::new());
    }

    // bcrypt dominates the cost here, so hash in parallel.
    draft_lecturers(departments, count, taken)
        .into_par_iter()
        .map(|draft| {
            let password_hash = bcrypt::hash(&draft.username, bcrypt::DEFAULT_COST)?;
            Ok(LecturerSeed {
                email: provisioned_email(&draft.username),
                name: draft.name,
                department_id: draft.department_id,
                title: draft.title,
                university: "UTM".to_string(),
                username: draft.username,
                password_hash,
            })
        })
        .collect()
}

pub async fn seed_lecturers(
    db: &PgPool,
    departments: &[DepartmentId],
    count: usize,
) -> Result<Vec<LecturerId>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} lecturers with supervisor accounts...", count);

    let mut taken: HashSet<String> = sqlx::query_scalar::<_, String>("SELECT username FROM users")
        .fetch_all(db)
        .await?
        .into_iter()
        .collect();

    let lecturers = generate_lecturers(departments, count, &mut taken)?;
    if lecturers.len() < count {
        println!(
            "   ⚠ Only found {} free usernames out of {} requested",
            lecturers.len(),
            count
        );
    }

    let ids = insert_lecturers_batch(db, &lecturers).await?;

    println!(
        "   ✓ Inserted {} lecturers in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts the accounts and then the lecturers that link to them, in one
/// transaction.
pub async fn insert_lecturers_batch(
    db: &PgPool,
    lecturers: &[LecturerSeed],
) -> Result<Vec<LecturerId>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 5 params per row in both statements
    const BATCH_SIZE: usize = 1000;

    let mut ids = Vec::with_capacity(lecturers.len());
    for chunk in lecturers.chunks(BATCH_SIZE) {
        let accounts = insert_accounts_chunk(&mut tx, chunk).await?;
        let staff_ids = staff_ids_by_username(chunk, accounts)?;
        ids.extend(insert_lecturers_chunk(&mut tx, chunk, &staff_ids).await?);
    }

    tx.commit().await?;
    Ok(ids)
}

/// Inserts one account per lecturer and returns `(id, username)` pairs in
/// whatever order Postgres produced them.
async fn insert_accounts_chunk(
    tx: &mut Transaction<'_, Postgres>,
    lecturers: &[LecturerSeed],
) -> Result<Vec<(i64, String)>, Box<dyn std::error::Error>> {
    if lecturers.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO users (username, email, password, role, is_first_time) VALUES {} RETURNING id, username",
        values_clause(lecturers.len(), 5)
    );

    let mut q = sqlx::query_as::<_, (i64, String)>(&query);
    for lecturer in lecturers {
        q = q
            .bind(&lecturer.username)
            .bind(&lecturer.email)
            .bind(&lecturer.password_hash)
            .bind(Role::Supervisor)
            .bind(true);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

/// Account id for each lecturer, in `lecturers` order.
fn staff_ids_by_username(
    lecturers: &[LecturerSeed],
    accounts: Vec<(i64, String)>,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let by_username: HashMap<String, i64> = accounts
        .into_iter()
        .map(|(id, username)| (username, id))
        .collect();

    lecturers
        .iter()
        .map(|lecturer| {
            by_username.get(&lecturer.username).copied().ok_or_else(
                || -> Box<dyn std::error::Error> {
                    format!("No account was created for '{}'", lecturer.username).into()
                },
            )
        })
        .collect()
}

async fn insert_lecturers_chunk(
    tx: &mut Transaction<'_, Postgres>,
    lecturers: &[LecturerSeed],
    staff_ids: &[i64],
) -> Result<Vec<LecturerId>, Box<dyn std::error::Error>> {
    if lecturers.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "INSERT INTO lecturers (name, department_id, title, university, staff_id) VALUES {} RETURNING id",
        values_clause(lecturers.len(), 5)
    );

    let mut q = sqlx::query_scalar(&query);
    for (lecturer, staff_id) in lecturers.iter().zip(staff_ids) {
        q = q
            .bind(&lecturer.name)
            .bind(lecturer.department_id)
            .bind(lecturer.title)
            .bind(&lecturer.university)
            .bind(*staff_id);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}
