//! Access policy knobs that are not tied to a single subsystem.

use crate::env::{flag_or, parse_or};

#[derive(Clone, Debug)]
pub struct AccessConfig {
    /// Let callers without a session use the entity endpoints with full
    /// visibility. Turn off in production.
    pub allow_anonymous: bool,
    /// Password reset code lifetime in seconds.
    pub reset_code_ttl: i64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allow_anonymous: true,
            reset_code_ttl: 259_200, // 3 days
        }
    }
}

impl AccessConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allow_anonymous: flag_or("ACCESS_ALLOW_ANONYMOUS", defaults.allow_anonymous),
            reset_code_ttl: parse_or("RESET_CODE_TTL", defaults.reset_code_ttl),
        }
    }
}
