//! `${VAR}` and `${VAR:-default}` expansion of configuration strings.

use std::cell::RefCell;
use std::convert::Infallible;

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// `${VAR}` fails when VAR is unset; `${VAR:-default}` falls back to the
/// default. An unset bare `$VAR` is left alone so URLs containing `$`
/// survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |var| std::env::var(var).ok())
}

/// Expand `value` with variables from `lookup`.
///
/// Every unset variable without a default is reported, not just the first.
fn expand_with(
    value: &str,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    let unset = RefCell::new(Vec::new());
    let expanded = shellexpand::env_with_context(value, |var| -> Result<_, Infallible> {
        let found = lookup(var);
        if found.is_none() {
            unset.borrow_mut().push(var.to_owned());
        }
        Ok(found)
    })
    .unwrap_or_else(|err| match err.cause {});

    let unset = unset.into_inner();
    // A variable with a default is looked up too; it only counts when
    // its reference is left in the output.
    let missing: Vec<String> = unset
        .into_iter()
        .filter(|var| expanded.contains(&format!("${{{var}}}")))
        .map(|var| format!("${{{var}}}"))
        .collect();

    if missing.is_empty() {
        Ok(expanded.into_owned())
    } else {
        Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("{} not set", missing.join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(name: &str) -> Option<String> {
        match name {
            "HOST" => Some("archive.example".to_owned()),
            "SALT" => Some("a2Frbw==".to_owned()),
            _ => None,
        }
    }

    #[test]
    fn test_expand_var() {
        let result = expand_with("https://${HOST}/", "site.base_url", vars).unwrap();
        assert_eq!(result, "https://archive.example/");
    }

    #[test]
    fn test_expand_default() {
        let result = expand_with("${UNSET:-}", "tripcode.secure_salt", vars).unwrap();
        assert_eq!(result, "");
        let result = expand_with("${SALT:-x}", "tripcode.secure_salt", vars).unwrap();
        assert_eq!(result, "a2Frbw==");
    }

    #[test]
    fn test_every_missing_var_reported() {
        let err = expand_with("${ONE}://${HOST}/${TWO}", "site.base_url", vars).unwrap_err();
        let ConfigError::EnvVar { field, message } = err else {
            panic!("expected an unset variable error");
        };
        assert_eq!(field, "site.base_url");
        assert_eq!(message, "${ONE}, ${TWO} not set");
    }

    #[test]
    fn test_bare_dollar_unchanged() {
        assert_eq!(
            expand_with("//host/$path", "site.remote_board_url", vars).unwrap(),
            "//host/$path"
        );
    }

    #[test]
    fn test_reads_process_environment() {
        let err = expand_env("${KAKO_TEST_EXPAND_NEVER_SET}", "site.base_url").unwrap_err();
        assert!(err.to_string().contains("KAKO_TEST_EXPAND_NEVER_SET"));
        assert!(err.to_string().contains("site.base_url"));
    }
}
