//! CLI argument definitions using clap derive macros.

use clap::{ArgAction, Parser, Subcommand};

use fanfetch_core::DEFAULT_BASE_URL;

use crate::commands::{
    BackoffCommand, CompareCommand, CredentialsCommand, DeleteCommand, GetCommand, PostCommand,
    PutCommand, RateLimitedCommand, TodoCommand,
};
use crate::error::CliError;

/// fanfetch - fetch many HTTP endpoints sequentially or concurrently
///
/// Compare fetch strategies and exercise a placeholder JSON API.
#[derive(Debug, Parser)]
#[command(
    name = "fanfetch",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase verbosity level (overrides RUST_LOG)"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Base URL of the JSON API
    #[arg(
        long,
        global = true,
        env = "FANFETCH_BASE_URL",
        default_value = DEFAULT_BASE_URL,
        help = "Base URL of the JSON API"
    )]
    pub base_url: String,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_enum,
        help = "Output format (text, json)"
    )]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    // === Fan-out ===

    /// Time the fetch strategies against the default endpoints
    Compare(CompareCommand),

    // === Single requests ===

    /// Send a GET request
    Get(GetCommand),

    /// Send a POST request with a JSON or form body
    Post(PostCommand),

    /// Send a PUT request
    Put(PutCommand),

    /// Send a DELETE request
    Delete(DeleteCommand),

    // === API client ===

    /// Fetch and decode a todo
    Todo(TodoCommand),

    // === Resilience ===

    /// Retry a GET with linear backoff
    Backoff(BackoffCommand),

    /// Issue paced GETs through a rate limiter
    RateLimited(RateLimitedCommand),

    // === Environment ===

    /// Show credentials read from the environment
    Credentials(CredentialsCommand),
}

impl Cli {
    /// Execute the selected command
    pub async fn execute(self) -> Result<(), CliError> {
        let ctx = CommandContext {
            base_url: self.base_url,
            format: self.format,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        match self.command {
            Command::Compare(cmd) => cmd.execute(&ctx).await,
            Command::Get(cmd) => cmd.execute(&ctx).await,
            Command::Post(cmd) => cmd.execute(&ctx).await,
            Command::Put(cmd) => cmd.execute(&ctx).await,
            Command::Delete(cmd) => cmd.execute(&ctx).await,
            Command::Todo(cmd) => cmd.execute(&ctx).await,
            Command::Backoff(cmd) => cmd.execute(&ctx).await,
            Command::RateLimited(cmd) => cmd.execute(&ctx).await,
            Command::Credentials(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub base_url: String,
    pub format: OutputFormat,
    pub verbose: u8,
    pub quiet: bool,
}

impl CommandContext {
    /// `path` joined onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}
