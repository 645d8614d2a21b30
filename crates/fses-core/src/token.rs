//! Opaque random tokens for password-reset codes and CSRF cookies.
//!
//! Tokens are drawn from the thread-local CSPRNG over the alphanumeric
//! alphabet, so they are URL-safe and can be embedded in a reset link as-is.

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Length of a password reset code.
pub const RESET_CODE_LENGTH: usize = 40;

/// Length of a CSRF cookie value.
pub const CSRF_TOKEN_LENGTH: usize = 32;

pub fn generate_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_reset_code() -> String {
    generate_token(RESET_CODE_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_reset_code_shape() {
        let code = generate_reset_code();
        assert_eq!(code.len(), RESET_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let codes: HashSet<String> = (0..200).map(|_| generate_reset_code()).collect();
        assert_eq!(codes.len(), 200);
    }
}
