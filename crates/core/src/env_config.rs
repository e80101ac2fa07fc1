//! Environment variable lookup with warn-level logging for invalid values.

/// Parse an environment variable, falling back to `default`.
///
/// An unset variable returns `default` silently; a set but unparsable one
/// logs a warning first.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Read an environment variable, treating empty or whitespace-only values as unset.
pub fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Read a boolean flag. Accepts `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn env_flag(var: &str, default: bool) -> bool {
    let Some(raw) = env_non_empty(var) else {
        return default;
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(var, value = %raw, default, "invalid boolean env var, using default");
            default
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns a distinct variable name, so parallel tests never race.
    fn set(var: &str, value: &str) {
        // SAFETY: the variable is unique to this test.
        unsafe { std::env::set_var(var, value) };
    }

    fn unset(var: &str) {
        // SAFETY: the variable is unique to this test.
        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn parse_valid_value() {
        let var = "CONTACT_IDENTITY_TEST_PARSE_VALID_5310";
        set(var, "42");
        let result: u32 = env_parse_with_default(var, 10);
        assert_eq!(result, 42);
        unset(var);
    }

    #[test]
    fn parse_invalid_value_falls_back() {
        let var = "CONTACT_IDENTITY_TEST_PARSE_INVALID_5311";
        set(var, "banana");
        let result: u16 = env_parse_with_default(var, 3000);
        assert_eq!(result, 3000);
        unset(var);
    }

    #[test]
    fn parse_missing_var_falls_back() {
        let var = "CONTACT_IDENTITY_TEST_PARSE_MISSING_5312";
        unset(var);
        let result: u32 = env_parse_with_default(var, 10);
        assert_eq!(result, 10);
    }

    #[test]
    fn non_empty_ignores_blank() {
        let var = "CONTACT_IDENTITY_TEST_NON_EMPTY_5313";
        set(var, "   ");
        assert_eq!(env_non_empty(var), None);
        set(var, " postgres://localhost/db ");
        assert_eq!(env_non_empty(var).as_deref(), Some("postgres://localhost/db"));
        unset(var);
    }

    #[test]
    fn flag_parses_common_spellings() {
        let var = "CONTACT_IDENTITY_TEST_FLAG_5314";
        set(var, "YES");
        assert!(env_flag(var, false));
        set(var, "off");
        assert!(!env_flag(var, true));
        set(var, "maybe");
        assert!(env_flag(var, true));
        unset(var);
        assert!(!env_flag(var, false));
    }
}
