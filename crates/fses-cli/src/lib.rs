//! # FSES CLI
//!
//! Operator tooling for FSES: account creation and database seeding.
//!
//! The binary wraps the [`seeder`] module; the functions are exported so they
//! can be driven from other tools or tests as well.
//!
//! ## Usage
//!
//! ```ignore
//! use fses_cli::seeder::{self, SeedConfig};
//!
//! seeder::populate_reference_data(&pool).await?;
//! seeder::seed_all(&pool, SeedConfig::new(10, 20)).await?;
//! ```

pub mod seeder;
