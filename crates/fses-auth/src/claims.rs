use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a session token.
///
/// The token only proves which session it was issued for. Role and lecturer
/// link are re-read from the store on every request so a role change or a
/// logout takes effect immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id (subject).
    pub sub: i64,
    /// Session id; must match a live row in `sessions`.
    pub sid: Uuid,
    /// Role at issue time, informational for clients decoding the token.
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}
