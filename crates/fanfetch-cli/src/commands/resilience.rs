//! Backoff and rate-limited request loops.

use std::time::Duration;

use clap::Parser;

use fanfetch_common_http::{fetch_rate_limited, fetch_with_backoff, HttpClient, RateLimiter, RetryPolicy};

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, ResponseOutput, StatusesOutput};

/// Upper bound for `--attempts` on both loops.
const MAX_ATTEMPTS: i64 = 1000;

/// Retry a GET with linear backoff
#[derive(Debug, Parser)]
pub struct BackoffCommand {
    /// URL to fetch (defaults to <base-url>/posts)
    pub url: Option<String>,

    /// Total attempts, including the first
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=MAX_ATTEMPTS))]
    pub attempts: u32,

    /// Backoff step in milliseconds; attempt n waits n * step
    #[arg(long, default_value_t = 1000)]
    pub step_ms: u64,
}

impl BackoffCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let url = self.url.clone().unwrap_or_else(|| ctx.url("posts"));
        let policy = RetryPolicy {
            max_attempts: self.attempts,
            step: Duration::from_millis(self.step_ms),
        };

        let body = fetch_with_backoff(&HttpClient::new()?, &url, &policy).await?;
        print_output(
            ctx,
            &ResponseOutput {
                status: 200,
                body: String::from_utf8_lossy(&body).into_owned(),
            },
        )
    }
}

/// Issue paced GETs through a rate limiter
#[derive(Debug, Parser)]
pub struct RateLimitedCommand {
    /// URL to fetch (defaults to <base-url>/posts)
    pub url: Option<String>,

    /// Number of requests to send
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=MAX_ATTEMPTS))]
    pub attempts: u32,

    /// Allowed requests per second
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_second: u32,
}

impl RateLimitedCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let url = self.url.clone().unwrap_or_else(|| ctx.url("posts"));
        let limiter = RateLimiter::per_second(self.per_second);

        let statuses = fetch_rate_limited(&HttpClient::new()?, &url, self.attempts, &limiter).await?;
        print_output(ctx, &StatusesOutput { url, statuses })
    }
}
