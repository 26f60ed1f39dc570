//! Single-endpoint retry with linear backoff.

use bytes::Bytes;
use std::time::Duration;

use crate::client::HttpError;
use crate::request::ApiRequest;
use crate::transport::Transport;

/// How many times to try and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay unit; attempt `n` waits `n * step` before the next try.
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given 1-based attempt fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.step.saturating_mul(attempt)
    }
}

/// Why an attempt is being retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// 429 Too Many Requests.
    RateLimited,
    /// Any other status that is not 200.
    Unsuccessful(u16),
}

impl RetryReason {
    fn classify(status: u16) -> Option<Self> {
        match status {
            200 => None,
            429 => Some(Self::RateLimited),
            other => Some(Self::Unsuccessful(other)),
        }
    }
}

/// GET `url` until it answers 200, backing off linearly between attempts.
///
/// 429 and every non-200 status are retried. A transport failure ends the
/// loop immediately without retrying. No delay follows the final attempt.
pub async fn fetch_with_backoff<T>(
    transport: &T,
    url: &str,
    policy: &RetryPolicy,
) -> Result<Bytes, HttpError>
where
    T: Transport + ?Sized,
{
    let mut last_status = None;

    for attempt in 1..=policy.max_attempts {
        let response = match transport.execute(ApiRequest::get(url)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, attempt, "Error fetching data: {}", e);
                return Err(e);
            }
        };

        let Some(reason) = RetryReason::classify(response.status) else {
            tracing::debug!(url = %url, attempt, "fetch succeeded");
            return Ok(response.body);
        };
        last_status = Some(response.status);

        if attempt == policy.max_attempts {
            break;
        }

        let delay = policy.delay_for(attempt);
        match reason {
            RetryReason::RateLimited => {
                tracing::warn!(url = %url, attempt, ?delay, "Rate limited. Retrying");
            }
            RetryReason::Unsuccessful(status) => {
                tracing::warn!(url = %url, attempt, status, ?delay, "Request not successful. Retrying");
            }
        }
        tokio::time::sleep(delay).await;
    }

    Err(HttpError::RetriesExhausted {
        attempts: policy.max_attempts,
        last_status,
    })
}
