//! CLI error handling.

use std::process::ExitCode;

use thiserror::Error;

use fanfetch_common_config::EnvError;
use fanfetch_common_http::HttpError;
use fanfetch_common_log::LogError;
use fanfetch_core::ApiError;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        url: Option<String>,
    },

    #[error("{message}")]
    Validation { message: String },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    /// Numeric exit status: 2 config, 4 network, 5 validation, 1 otherwise.
    pub fn code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Network { .. } => 4,
            Self::Validation { .. } => 5,
            Self::Other(_) => 1,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a config error with hint
    pub fn config_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: Some(hint.into()),
        }
    }

    pub fn network(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
            url: Some(url.into()),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<HttpError> for CliError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::InvalidUrl { .. } => Self::validation(err.to_string()),
            HttpError::ClientBuild(_) => Self::Config {
                message: err.to_string(),
                source: Some(Box::new(err)),
                hint: None,
            },
            other => Self::Network {
                message: other.to_string(),
                source: Some(Box::new(other)),
                url: None,
            },
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Http(e) => e.into(),
            ApiError::UnexpectedStatus { status, .. } => Self::Network {
                message: format!("Unexpected status code: {status}"),
                source: None,
                url: None,
            },
            ApiError::Decode(_) | ApiError::Encode(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<EnvError> for CliError {
    fn from(err: EnvError) -> Self {
        Self::Config {
            message: format!("Environment error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Set USERNAME and PASSWORD, or add them to .env".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: err.to_string(),
            source: Some(Box::new(err)),
            hint: Some("Check FANFETCH_LOG_FILE".to_string()),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation(format!("Invalid JSON: {err}"))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(err.into())
    }
}
