//! Todo command implementation.

use clap::Parser;
use serde::Serialize;

use fanfetch_common_config::Credentials;
use fanfetch_common_http::HttpClient;
use fanfetch_core::{Todo, TodoClient, TodoSummary};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, FormattedOutput};

/// Fetch and decode a todo
#[derive(Debug, Parser)]
pub struct TodoCommand {
    /// Todo id
    #[arg(default_value_t = 1)]
    pub id: u32,

    /// Decode only userId, id and completed
    #[arg(long)]
    pub summary: bool,

    /// Send USERNAME/PASSWORD from the environment as basic auth
    #[arg(long)]
    pub auth: bool,
}

impl TodoCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let mut client = TodoClient::new(HttpClient::new()?, ctx.base_url.as_str());
        if self.auth {
            let credentials = Credentials::require_from_env()?;
            client = client.with_basic_auth(&credentials.username, credentials.password.expose());
        }

        if self.summary {
            let summary = client.fetch_summary(self.id).await?;
            print_output(ctx, &SummaryOutput(summary))
        } else {
            let todo = client.fetch_todo(self.id).await?;
            print_output(ctx, &TodoOutput(todo))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct TodoOutput(Todo);

impl FormattedOutput for TodoOutput {
    fn format_text(&self) -> String {
        let todo = &self.0;
        format!(
            "Todo {} (user {}): {}\nCompleted: {}",
            todo.id, todo.user_id, todo.title, todo.completed
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
struct SummaryOutput(TodoSummary);

impl FormattedOutput for SummaryOutput {
    fn format_text(&self) -> String {
        let summary = &self.0;
        format!(
            "Todo {} (user {})\nCompleted: {}",
            summary.id, summary.user_id, summary.completed
        )
    }
}
