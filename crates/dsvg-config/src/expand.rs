//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::ConfigError;

/// Expand `${VAR}` references using `lookup` to resolve variables.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        lookup(var).map(Some).ok_or_else(|| LookupError {
            var_name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn env(var: &str) -> Option<String> {
        match var {
            "HOST" => Some("example.com".to_owned()),
            "PORT" => Some("8080".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_simple_var() {
        assert_eq!(expand_with("${HOST}", "server.host", env).unwrap(), "example.com");
    }

    #[test]
    fn test_expand_with_default_uses_value() {
        assert_eq!(
            expand_with("${HOST:-localhost}", "server.host", env).unwrap(),
            "example.com"
        );
    }

    #[test]
    fn test_expand_with_default_uses_default() {
        assert_eq!(
            expand_with("${UNSET:-localhost}", "server.host", env).unwrap(),
            "localhost"
        );
    }

    #[test]
    fn test_expand_missing_var_error() {
        let err = expand_with("${MISSING}", "server.host", env).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING"));
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_expand_literal_unchanged() {
        assert_eq!(expand_with("0.0.0.0", "server.host", env).unwrap(), "0.0.0.0");
        assert_eq!(expand_with("$HOST", "server.host", env).unwrap(), "$HOST");
    }

    #[test]
    fn test_expand_multiple_vars() {
        assert_eq!(
            expand_with("${HOST}:${PORT}", "server.host", env).unwrap(),
            "example.com:8080"
        );
    }
}
