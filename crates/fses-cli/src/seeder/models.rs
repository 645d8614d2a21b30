//! Row shapes and configuration for seeding.

use fses_models::{DepartmentId, EvaluationType, LecturerId, Program, Title};

/// A fake lecturer together with the account provisioned for them.
pub struct LecturerSeed {
    pub name: String,
    pub department_id: DepartmentId,
    pub title: Title,
    pub university: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

pub struct StudentSeed {
    pub name: String,
    pub supervisor_id: Option<LecturerId>,
    pub co_supervisor_id: Option<LecturerId>,
    pub program: Program,
    pub semester: i16,
    pub evaluation_type: EvaluationType,
    pub department_id: DepartmentId,
}

/// How many fake rows `seed` inserts.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub lecturers: usize,
    pub students: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            lecturers: 10,
            students: 20,
        }
    }
}

impl SeedConfig {
    pub fn new(lecturers: usize, students: usize) -> Self {
        Self {
            lecturers,
            students,
        }
    }
}
