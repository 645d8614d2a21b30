//! Request extractors and access rules.
//!
//! - [`auth`]: `AuthUser` and `Caller` extractors that resolve the session
//!   behind a bearer token into an [`auth::Identity`]
//! - [`access`]: role gates for writes and nomination visibility
//!
//! Handlers take the identity as an argument; nothing is stored globally.
//!
//! ```ignore
//! async fn delete_nomination(caller: Caller, ...) -> Result<StatusCode, AppError> {
//!     caller.authorize(Action::DeleteNomination)?;
//!     let scope = caller.nomination_scope();
//!     // ...
//! }
//! ```

pub mod access;
pub mod auth;
