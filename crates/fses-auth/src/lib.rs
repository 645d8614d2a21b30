//! # FSES Auth
//!
//! Session token claims and JWT utilities.
//!
//! A successful login creates a row in `sessions` and hands the client a signed
//! token naming that row. Verifying the token is the first half of
//! authentication; the server then checks the session row is still live.
//!
//! ```ignore
//! use fses_auth::{create_session_token, verify_session_token};
//!
//! let token = create_session_token(user_id, session_id, "SUPERVISOR", &jwt_config)?;
//! let claims = verify_session_token(&token, &jwt_config)?;
//! assert_eq!(claims.sid, session_id);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::SessionClaims;
pub use jwt::{create_session_token, verify_session_token};
