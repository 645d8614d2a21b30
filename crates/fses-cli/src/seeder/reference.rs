//! The fixed demo dataset behind `fses-cli populate`.
//!
//! Every insert is keyed on a natural identifier (department code, lecturer
//! name, username, student name, nominated student), so running it twice leaves
//! the database unchanged.

use fses_models::{
    DepartmentId, EvaluationType, LecturerId, Program, Role, StudentId, Title, UserId,
};
use sqlx::{PgConnection, PgPool};

/// Password shared by the four demo accounts.
pub const DEMO_PASSWORD: &str = "password123";

const DEPARTMENTS: [(&str, &str); 4] = [
    ("Software Engineering and Advanced Technology", "SEAT"),
    ("Information and Intelligence", "II"),
    ("Bioinformatics and Health Geography", "BIHG"),
    ("Cybersecurity and Artificial Intelligence", "CAI"),
];

struct LecturerRow {
    name: &'static str,
    department: usize,
    title: Title,
    university: &'static str,
}

const LECTURERS: [LecturerRow; 5] = [
    LecturerRow {
        name: "Dr. Ahmad Rahman",
        department: 0,
        title: Title::Doctor,
        university: "UTM",
    },
    LecturerRow {
        name: "Prof. Dr. Siti Aminah",
        department: 1,
        title: Title::Professor,
        university: "UTM",
    },
    LecturerRow {
        name: "AP. Dr. Mohammad Ali",
        department: 2,
        title: Title::AssociateProfessor,
        university: "UTM",
    },
    LecturerRow {
        name: "Dr. Fatimah Wong",
        department: 3,
        title: Title::Doctor,
        university: "UTM",
    },
    LecturerRow {
        name: "Prof. Dr. Kumar Singh",
        department: 0,
        title: Title::Professor,
        university: "External University",
    },
];

const ACCOUNTS: [(&str, &str, Role); 4] = [
    ("office_assistant", "office@utm.edu", Role::OfficeAssistant),
    ("supervisor", "supervisor@utm.edu", Role::Supervisor),
    ("program_coordinator", "coordinator@utm.edu", Role::ProgramCoordinator),
    ("pgam", "pgam@utm.edu", Role::Pgam),
];

struct StudentRow {
    name: &'static str,
    department: usize,
    supervisor: usize,
    co_supervisor: Option<usize>,
    program: Program,
    evaluation_type: EvaluationType,
    semester: i16,
    research_title: &'static str,
}

const STUDENTS: [StudentRow; 6] = [
    StudentRow {
        name: "AHMAD FAIRUZ BIN ALI",
        department: 0,
        supervisor: 0,
        co_supervisor: Some(3),
        program: Program::Phd,
        evaluation_type: EvaluationType::FirstEvaluation,
        semester: 3,
        research_title: "Causal inference in banking sector",
    },
    StudentRow {
        name: "AINUL FARHAH BINTI MOHD FAHIMEY",
        department: 1,
        supervisor: 1,
        co_supervisor: None,
        program: Program::Mphil,
        evaluation_type: EvaluationType::FirstEvaluation,
        semester: 2,
        research_title: "ENHANCING LEARNING MANAGEMENT SYSTEM UTILIZATION FOR VOCATIONAL COLLEGES IN MALAYSIA",
    },
    StudentRow {
        name: "ANIS AFIQAH BINTI SHARIP",
        department: 2,
        supervisor: 2,
        co_supervisor: Some(3),
        program: Program::Phd,
        evaluation_type: EvaluationType::FirstEvaluation,
        semester: 3,
        research_title: "Design Thinking Framework for Requirements Elicitation with Cognitive Consideration for Older Adults",
    },
    StudentRow {
        name: "AYMEN YOUSEF AHMED ASHAWESH",
        department: 3,
        supervisor: 3,
        co_supervisor: None,
        program: Program::Phd,
        evaluation_type: EvaluationType::ReEvaluation,
        semester: 7,
        research_title: "TOWARDS THE ADOPTION OF DISTANT LEARNING IN CONFLICT ZONES",
    },
    StudentRow {
        name: "FATIMAH ZAHRA",
        department: 0,
        supervisor: 0,
        co_supervisor: None,
        program: Program::Dse,
        evaluation_type: EvaluationType::FirstEvaluation,
        semester: 1,
        research_title: "",
    },
    StudentRow {
        name: "BAHAA SALIM ABDULAMEER",
        department: 2,
        supervisor: 2,
        co_supervisor: None,
        program: Program::Phd,
        evaluation_type: EvaluationType::ReEvaluation,
        semester: 4,
        research_title: "EXPLAINABLE ARTIFICIAL INTELLIGENCE (XAI) TECHNIQUES IN LUNG DISEASE",
    },
];

/// Student index, then examiner 1-3 and chairperson as lecturer indexes.
type NominationRow = (usize, [Option<usize>; 3], Option<usize>);

const NOMINATIONS: [NominationRow; 5] = [
    (0, [Some(2), Some(4), None], Some(1)),
    (1, [Some(0), Some(3), Some(2)], None),
    (2, [Some(1), Some(3), Some(0)], None),
    (3, [Some(2), Some(0), Some(4)], Some(1)),
    (5, [None, Some(0), Some(4)], None),
];

/// Inserts the demo dataset. Rows that already exist are reported and reused.
pub async fn populate_reference_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    let mut departments = Vec::with_capacity(DEPARTMENTS.len());
    for (name, code) in DEPARTMENTS {
        departments.push(ensure_department(&mut tx, name, code).await?);
    }

    let mut lecturers = Vec::with_capacity(LECTURERS.len());
    for row in &LECTURERS {
        lecturers.push(ensure_lecturer(&mut tx, row, departments[row.department]).await?);
    }

    let password_hash = bcrypt::hash(DEMO_PASSWORD, bcrypt::DEFAULT_COST)?;
    let mut supervisor_account = None;
    for (username, email, role) in ACCOUNTS {
        let id = ensure_account(&mut tx, username, email, role, &password_hash).await?;
        if role == Role::Supervisor {
            supervisor_account = Some(id);
        }
    }

    if let Some(account) = supervisor_account {
        // Any earlier holder of the link is cleared first to keep staff_id unique.
        sqlx::query("UPDATE lecturers SET staff_id = NULL WHERE staff_id = $1 AND id <> $2")
            .bind(account)
            .bind(lecturers[0])
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE lecturers SET staff_id = $1 WHERE id = $2")
            .bind(account)
            .bind(lecturers[0])
            .execute(&mut *tx)
            .await?;
        println!("   🔗 Linked supervisor account to {}", LECTURERS[0].name);
    }

    let mut students = Vec::with_capacity(STUDENTS.len());
    for row in &STUDENTS {
        students.push(ensure_student(&mut tx, row, &departments, &lecturers).await?);
    }

    for (student, examiners, chairperson) in NOMINATIONS {
        let pick = |idx: Option<usize>| idx.map(|i| lecturers[i]);
        let result = sqlx::query(
            r#"
            INSERT INTO nominations
                (student_id, examiner1_id, examiner2_id, examiner3_id, chairperson_id, research_title)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id) DO NOTHING
            "#,
        )
        .bind(students[student])
        .bind(pick(examiners[0]))
        .bind(pick(examiners[1]))
        .bind(pick(examiners[2]))
        .bind(pick(chairperson))
        .bind(STUDENTS[student].research_title)
        .execute(&mut *tx)
        .await?;

        report(result.rows_affected() > 0, "nomination for", STUDENTS[student].name);
    }

    tx.commit().await?;
    Ok(())
}

fn report(created: bool, kind: &str, name: &str) {
    if created {
        println!("   ✓ Created {}: {}", kind, name);
    } else {
        println!("   · {} already exists: {}", kind, name);
    }
}

async fn ensure_department(
    conn: &mut PgConnection,
    name: &str,
    code: &str,
) -> Result<DepartmentId, sqlx::Error> {
    let existing = sqlx::query_scalar("SELECT id FROM departments WHERE code = $1 ORDER BY id LIMIT 1")
        .bind(code)
        .fetch_optional(&mut *conn)
        .await?;
    report(existing.is_none(), "department", name);

    match existing {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar("INSERT INTO departments (name, code) VALUES ($1, $2) RETURNING id")
                .bind(name)
                .bind(code)
                .fetch_one(&mut *conn)
                .await
        }
    }
}

async fn ensure_lecturer(
    conn: &mut PgConnection,
    row: &LecturerRow,
    department: DepartmentId,
) -> Result<LecturerId, sqlx::Error> {
    let existing = sqlx::query_scalar("SELECT id FROM lecturers WHERE name = $1 ORDER BY id LIMIT 1")
        .bind(row.name)
        .fetch_optional(&mut *conn)
        .await?;
    report(existing.is_none(), "lecturer", row.name);

    match existing {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar(
                "INSERT INTO lecturers (name, department_id, title, university) VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(row.name)
            .bind(department)
            .bind(row.title)
            .bind(row.university)
            .fetch_one(&mut *conn)
            .await
        }
    }
}

async fn ensure_account(
    conn: &mut PgConnection,
    username: &str,
    email: &str,
    role: Role,
    password_hash: &str,
) -> Result<UserId, sqlx::Error> {
    let inserted = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password, role, is_first_time)
        VALUES ($1, $2, $3, $4, FALSE)
        ON CONFLICT (username) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(&mut *conn)
    .await?;
    report(inserted.is_some(), "account", username);

    match inserted {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
                .bind(username)
                .fetch_one(&mut *conn)
                .await
        }
    }
}

async fn ensure_student(
    conn: &mut PgConnection,
    row: &StudentRow,
    departments: &[DepartmentId],
    lecturers: &[LecturerId],
) -> Result<StudentId, sqlx::Error> {
    let existing = sqlx::query_scalar("SELECT id FROM students WHERE name = $1 ORDER BY id LIMIT 1")
        .bind(row.name)
        .fetch_optional(&mut *conn)
        .await?;
    report(existing.is_none(), "student", row.name);

    match existing {
        Some(id) => Ok(id),
        None => {
            sqlx::query_scalar(
                r#"
                INSERT INTO students
                    (name, supervisor_id, co_supervisor_id, program, semester, evaluation_type, department_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING id
                "#,
            )
            .bind(row.name)
            .bind(lecturers[row.supervisor])
            .bind(row.co_supervisor.map(|i| lecturers[i]))
            .bind(row.program)
            .bind(row.semester)
            .bind(row.evaluation_type)
            .bind(departments[row.department])
            .fetch_one(&mut *conn)
            .await
        }
    }
}
