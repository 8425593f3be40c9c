//! Deployment name resolution.
//!
//! A deployment name can come from three places, in order of precedence:
//! an explicit argument, the `TABULA_DEPLOYMENT` environment variable,
//! and the `local` default.

use std::env;

/// Name of the implicit local emulator deployment.
pub const LOCAL_DEPLOYMENT: &str = "local";

/// Environment variable consulted when no explicit deployment is given.
pub const DEPLOYMENT_ENV_VAR: &str = "TABULA_DEPLOYMENT";

/// Resolves an optional deployment name to a concrete one.
///
/// Returns the given name if it is non-empty, else the value of
/// `TABULA_DEPLOYMENT`, else `local`.
///
/// # Examples
///
/// ```
/// use tabula::config::resolve_deployment;
///
/// assert_eq!(resolve_deployment(Some("prod")), "prod");
/// ```
#[must_use]
pub fn resolve_deployment(name: Option<&str>) -> String {
    if let Some(name) = name {
        if !name.is_empty() {
            return name.to_string();
        }
    }

    if let Ok(from_env) = env::var(DEPLOYMENT_ENV_VAR) {
        if !from_env.is_empty() {
            return from_env;
        }
    }

    LOCAL_DEPLOYMENT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_explicit_name_wins() {
        assert_eq!(resolve_deployment(Some("prod")), "prod");
    }

    #[test]
    #[serial]
    fn test_explicit_name_overrides_env() {
        let saved = env::var(DEPLOYMENT_ENV_VAR).ok();

        env::set_var(DEPLOYMENT_ENV_VAR, "staging");
        assert_eq!(resolve_deployment(Some("prod")), "prod");

        match saved {
            Some(val) => env::set_var(DEPLOYMENT_ENV_VAR, val),
            None => env::remove_var(DEPLOYMENT_ENV_VAR),
        }
    }

    #[test]
    #[serial]
    fn test_empty_name_falls_back_to_env() {
        let saved = env::var(DEPLOYMENT_ENV_VAR).ok();

        env::set_var(DEPLOYMENT_ENV_VAR, "staging");
        assert_eq!(resolve_deployment(Some("")), "staging");
        assert_eq!(resolve_deployment(None), "staging");

        match saved {
            Some(val) => env::set_var(DEPLOYMENT_ENV_VAR, val),
            None => env::remove_var(DEPLOYMENT_ENV_VAR),
        }
    }

    #[test]
    #[serial]
    fn test_default_is_local() {
        let saved = env::var(DEPLOYMENT_ENV_VAR).ok();

        env::remove_var(DEPLOYMENT_ENV_VAR);
        assert_eq!(resolve_deployment(None), LOCAL_DEPLOYMENT);
        assert_eq!(resolve_deployment(Some("")), LOCAL_DEPLOYMENT);

        if let Some(val) = saved {
            env::set_var(DEPLOYMENT_ENV_VAR, val);
        }
    }
}
