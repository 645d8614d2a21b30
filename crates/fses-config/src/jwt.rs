use crate::env::{parse_or, string_or};

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in seconds.
    pub session_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: string_or("JWT_SECRET", "your-secret-key-change-in-production"),
            session_expiry: parse_or("SESSION_EXPIRY", 1_209_600), // 14 days
        }
    }
}
