pub mod auth;
pub mod departments;
pub mod lecturers;
pub mod nominations;
pub mod students;
pub mod users;
