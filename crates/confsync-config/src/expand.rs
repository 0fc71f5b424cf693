//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present,
/// so credentials containing a bare `$` are passed through untouched.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand an optional value, leaving `None` as is.
pub(crate) fn expand_env_opt(
    value: Option<&str>,
    field: &str,
) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_simple_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CONFSYNC_TEST_SIMPLE", "hello");
        }
        let result = expand_env("${CONFSYNC_TEST_SIMPLE}", "test.field").unwrap();
        assert_eq!(result, "hello");
        unsafe {
            std::env::remove_var("CONFSYNC_TEST_SIMPLE");
        }
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CONFSYNC_TEST_UNSET");
        }
        let result = expand_env("${CONFSYNC_TEST_UNSET:-fallback}", "test.field").unwrap();
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("CONFSYNC_TEST_MISSING");
        }
        let err = expand_env("${CONFSYNC_TEST_MISSING}", "confluence.api_token").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("CONFSYNC_TEST_MISSING"));
        assert!(err.to_string().contains("confluence.api_token"));
    }

    #[test]
    fn test_expand_embedded_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CONFSYNC_TEST_HOST", "wiki.example.com");
        }
        let result = expand_env("https://${CONFSYNC_TEST_HOST}/wiki", "test.url").unwrap();
        assert_eq!(result, "https://wiki.example.com/wiki");
        unsafe {
            std::env::remove_var("CONFSYNC_TEST_HOST");
        }
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        let result = expand_env("pa$$word", "test.field").unwrap();
        assert_eq!(result, "pa$$word");
    }

    #[test]
    fn test_expand_opt_none_stays_none() {
        assert_eq!(expand_env_opt(None, "test.field").unwrap(), None);
    }
}
