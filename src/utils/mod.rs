//! Shared utilities for the FSES API.
//!
//! - [`email`]: SMTP delivery of password reset codes
pub mod email;
