//! Credentials sourced from environment variables.

use fanfetch_common_secret::SecretString;

use crate::env::{vars, EnvError, Environment};

/// A username/password pair read from the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Plain username.
    pub username: String,
    /// Password, redacted in all formatted output.
    pub password: SecretString,
}

impl Credentials {
    /// Read `USERNAME` and `PASSWORD`, treating unset variables as empty.
    pub fn from_env() -> Self {
        Self::from_vars(vars::USERNAME, vars::PASSWORD)
    }

    /// Read `USERNAME` and `PASSWORD`, failing if either is unset.
    pub fn require_from_env() -> Result<Self, EnvError> {
        Self::require_vars(vars::USERNAME, vars::PASSWORD)
    }

    /// Read credentials from custom variable names.
    pub fn from_vars(username_var: &str, password_var: &str) -> Self {
        Self {
            username: Environment::get_or(username_var, ""),
            password: SecretString::new(Environment::get_or(password_var, "")),
        }
    }

    /// Read credentials from custom variable names, failing if either is unset.
    pub fn require_vars(username_var: &str, password_var: &str) -> Result<Self, EnvError> {
        Ok(Self {
            username: Environment::require(username_var)?,
            password: SecretString::new(Environment::require(password_var)?),
        })
    }

    /// Whether both parts are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.expose().is_empty()
    }
}
