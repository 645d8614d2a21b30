use std::env;
use std::str::FromStr;

/// Reads and parses an environment variable, falling back to `default` when the
/// variable is unset or does not parse.
pub(crate) fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

pub(crate) fn flag_or(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}

pub(crate) fn string_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back_on_missing_or_garbage() {
        assert_eq!(parse_or("FSES_TEST_UNSET_NUMBER", 42_i64), 42);

        unsafe { env::set_var("FSES_TEST_GARBAGE_NUMBER", "soon") };
        assert_eq!(parse_or("FSES_TEST_GARBAGE_NUMBER", 7_i64), 7);

        unsafe { env::set_var("FSES_TEST_PADDED_NUMBER", " 900 ") };
        assert_eq!(parse_or("FSES_TEST_PADDED_NUMBER", 7_i64), 900);
    }

    #[test]
    fn test_flag_or() {
        assert!(flag_or("FSES_TEST_UNSET_FLAG", true));

        unsafe { env::set_var("FSES_TEST_FLAG_YES", "Yes") };
        assert!(flag_or("FSES_TEST_FLAG_YES", false));

        unsafe { env::set_var("FSES_TEST_FLAG_OFF", "false") };
        assert!(!flag_or("FSES_TEST_FLAG_OFF", true));
    }

    #[test]
    fn test_string_or() {
        assert_eq!(string_or("FSES_TEST_UNSET_STRING", "fallback"), "fallback");
    }
}
