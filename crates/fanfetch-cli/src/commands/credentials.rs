//! Credentials command implementation.

use clap::Parser;
use serde::Serialize;

use fanfetch_common_config::Credentials;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Show credentials read from the environment
#[derive(Debug, Parser)]
pub struct CredentialsCommand {
    /// Fail when USERNAME or PASSWORD is unset
    #[arg(long)]
    pub require: bool,
}

impl CredentialsCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let credentials = if self.require {
            Credentials::require_from_env()?
        } else {
            Credentials::from_env()
        };
        print_output(ctx, &CredentialsOutput::from(&credentials))
    }
}

#[derive(Debug, Serialize)]
struct CredentialsOutput {
    username: String,
    password: String,
}

impl From<&Credentials> for CredentialsOutput {
    fn from(credentials: &Credentials) -> Self {
        Self {
            username: credentials.username.clone(),
            password: credentials.password.to_string(),
        }
    }
}

impl FormattedOutput for CredentialsOutput {
    fn format_text(&self) -> String {
        format!("Username: {}\nPassword: {}", self.username, self.password)
    }
}
