//! Output formatting utilities for CLI commands.

use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use fanfetch_common_http::RawResponse;
use fanfetch_common_log::spans::took_line;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error>
    where
        Self: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

/// Print formatted output to stdout
pub fn print_output<T>(ctx: &CommandContext, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    write_output(ctx.format, value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(format: OutputFormat, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
    W: Write,
{
    let output = match format {
        OutputFormat::Text => value.format_text(),
        OutputFormat::Json => value.format_json()?,
    };

    writeln!(writer, "{}", output)?;
    Ok(())
}

/// One timed strategy run.
#[derive(Debug, Serialize)]
pub struct TimingOutput {
    pub operation: String,
    pub took_ms: u64,
    #[serde(skip)]
    pub took: Duration,
}

impl TimingOutput {
    pub fn new(operation: impl Into<String>, took: Duration) -> Self {
        Self {
            operation: operation.into(),
            took_ms: u64::try_from(took.as_millis()).unwrap_or(u64::MAX),
            took,
        }
    }
}

impl FormattedOutput for TimingOutput {
    fn format_text(&self) -> String {
        took_line(&self.operation, self.took)
    }
}

/// Status code plus body of a single request.
#[derive(Debug, Serialize)]
pub struct ResponseOutput {
    pub status: u16,
    pub body: String,
}

impl From<&RawResponse> for ResponseOutput {
    fn from(response: &RawResponse) -> Self {
        Self {
            status: response.status,
            body: response.text(),
        }
    }
}

impl FormattedOutput for ResponseOutput {
    fn format_text(&self) -> String {
        format!("Response Status Code: {}\nResponse Body: {}", self.status, self.body)
    }
}

/// Statuses observed by a paced request loop.
#[derive(Debug, Serialize)]
pub struct StatusesOutput {
    pub url: String,
    pub statuses: Vec<u16>,
}

impl FormattedOutput for StatusesOutput {
    fn format_text(&self) -> String {
        self.statuses
            .iter()
            .enumerate()
            .map(|(i, status)| format!("Attempt {}: status {}", i + 1, status))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
