//! # FSES Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: session token signing and lifetime
//! - [`cors`]: allowed browser origins
//! - [`email`]: SMTP settings for reset-code mail
//! - [`access`]: anonymous access policy and reset code lifetime
//!
//! # Example
//!
//! ```ignore
//! use fses_config::{AccessConfig, CorsConfig, EmailConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let access_config = AccessConfig::from_env();
//! ```

pub mod access;
pub mod cors;
pub mod email;
mod env;
pub mod jwt;

pub use access::AccessConfig;
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
