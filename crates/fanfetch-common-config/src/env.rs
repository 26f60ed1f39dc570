//! Environment variable handling.

use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("required environment variable not set: {var}")]
    NotSet { var: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names.
pub mod vars {
    // Credentials
    pub const USERNAME: &str = "USERNAME";
    pub const PASSWORD: &str = "PASSWORD";

    // Configuration
    pub const FANFETCH_BASE_URL: &str = "FANFETCH_BASE_URL";
    pub const FANFETCH_LOG_LEVEL: &str = "FANFETCH_LOG_LEVEL";
    pub const FANFETCH_ENV: &str = "FANFETCH_ENV";

    // Development
    pub const RUST_LOG: &str = "RUST_LOG";
}

/// Environment configuration.
pub struct Environment {
    _guard: (), // Prevent construction outside module
}

impl Environment {
    /// Initialize environment from .env files.
    ///
    /// Missing files are not an error; a file that exists but cannot be
    /// parsed is.
    pub fn init() -> Result<Self, EnvError> {
        load_optional(".env")?;
        load_optional(".env.local")?;

        if let Ok(profile) = env::var(vars::FANFETCH_ENV) {
            load_optional(&format!(".env.{}", profile))?;
        }

        Ok(Self { _guard: () })
    }

    /// Get a required string variable.
    pub fn require(var: &str) -> Result<String, EnvError> {
        env::var(var).map_err(|_| EnvError::NotSet { var: var.to_string() })
    }

    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Get a variable with a default value.
    pub fn get_or(var: &str, default: &str) -> String {
        env::var(var).unwrap_or_else(|_| default.to_string())
    }

    /// Get a boolean variable.
    pub fn get_bool(var: &str) -> Option<bool> {
        env::var(var).ok().map(|v| {
            matches!(v.to_lowercase().as_str(), "true" | "1" | "yes")
        })
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match env::var(var) {
            Ok(v) => v.parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: "expected integer".to_string(),
            }),
            Err(_) => Ok(None),
        }
    }
}

fn load_optional(path: &str) -> Result<(), EnvError> {
    match dotenvy::from_filename(path) {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_default() {
        let val = Environment::get_or("FANFETCH_NONEXISTENT_VAR_12345", "default");
        assert_eq!(val, "default");
    }

    #[test]
    fn test_require_missing() {
        let err = Environment::require("FANFETCH_NONEXISTENT_VAR_67890").unwrap_err();
        assert!(matches!(err, EnvError::NotSet { ref var } if var == "FANFETCH_NONEXISTENT_VAR_67890"));
        assert!(err.to_string().contains("not set"));
    }

    #[test]
    fn test_bool_parsing() {
        env::set_var("FANFETCH_TEST_BOOL", "true");
        assert_eq!(Environment::get_bool("FANFETCH_TEST_BOOL"), Some(true));
        env::set_var("FANFETCH_TEST_BOOL", "1");
        assert_eq!(Environment::get_bool("FANFETCH_TEST_BOOL"), Some(true));
        env::set_var("FANFETCH_TEST_BOOL", "false");
        assert_eq!(Environment::get_bool("FANFETCH_TEST_BOOL"), Some(false));
        env::remove_var("FANFETCH_TEST_BOOL");
        assert_eq!(Environment::get_bool("FANFETCH_TEST_BOOL"), None);
    }

    #[test]
    fn test_integer_parsing() {
        env::set_var("FANFETCH_TEST_INT", "42");
        let val: Result<Option<i32>, _> = Environment::get_int("FANFETCH_TEST_INT");
        assert_eq!(val.unwrap(), Some(42));

        env::set_var("FANFETCH_TEST_INT", "invalid");
        let val: Result<Option<i32>, _> = Environment::get_int("FANFETCH_TEST_INT");
        assert!(val.is_err());

        env::remove_var("FANFETCH_TEST_INT");
        let val: Result<Option<i32>, _> = Environment::get_int("FANFETCH_TEST_INT");
        assert_eq!(val.unwrap(), None);
    }

    #[test]
    fn test_environment_init() {
        // No .env files in the crate directory
        let result = Environment::init();
        assert!(result.is_ok());
    }

    #[test]
    fn test_dotenv_file_loading() {
        use std::fs;
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env.fanfetch-test");
        fs::write(&env_path, "FANFETCH_TEST_DOTENV_VAR=from_dotenv\n").unwrap();

        env::remove_var("FANFETCH_TEST_DOTENV_VAR");
        load_optional(env_path.to_str().unwrap()).unwrap();

        assert_eq!(
            Environment::get("FANFETCH_TEST_DOTENV_VAR"),
            Some("from_dotenv".to_string())
        );
        env::remove_var("FANFETCH_TEST_DOTENV_VAR");
    }

    #[test]
    fn test_missing_dotenv_file_is_ignored() {
        assert!(load_optional("/nonexistent/fanfetch/.env").is_ok());
    }
}
