//! # FSES Core
//!
//! Core types, errors, and utilities for the FSES API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`serde`]: Serde helpers for partial-update payloads
//! - [`token`]: Random opaque tokens (reset codes, CSRF cookies)
//!
//! # Example
//!
//! ```ignore
//! use fses_core::{AppError, hash_password, verify_password};
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//!
//! let err = AppError::field("name", "This field is required.");
//! ```

pub mod errors;
pub mod password;
pub mod serde;
pub mod token;

pub use errors::{AppError, ErrorResponse, FieldErrors};
pub use password::{hash_password, verify_password};
pub use token::{generate_reset_code, generate_token};
