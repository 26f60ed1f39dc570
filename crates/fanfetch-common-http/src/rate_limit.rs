//! Client-side request pacing.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::client::HttpError;
use crate::request::ApiRequest;
use crate::transport::Transport;

/// Spaces calls evenly at a fixed rate with a burst of one.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Allow `per_second` calls per second (values below 1 are treated as 1).
    pub fn per_second(per_second: u32) -> Self {
        Self::with_interval(Duration::from_secs(1) / per_second.max(1))
    }

    /// Allow one call per `interval`.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// Minimum spacing between calls.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next slot is free and claim it.
    pub async fn acquire(&self) {
        let mut next_slot = self.next_slot.lock().await;
        let now = Instant::now();
        let slot = match *next_slot {
            Some(slot) if slot > now => slot,
            _ => now,
        };
        *next_slot = Some(slot + self.interval);
        // Hold the lock while sleeping so waiters queue in order.
        tokio::time::sleep_until(slot).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::per_second(10)
    }
}

/// Issue `attempts` paced GETs to `url`, returning the observed statuses.
///
/// The first transport failure stops the loop and is returned.
pub async fn fetch_rate_limited<T>(
    transport: &T,
    url: &str,
    attempts: u32,
    limiter: &RateLimiter,
) -> Result<Vec<u16>, HttpError>
where
    T: Transport + ?Sized,
{
    let mut statuses = Vec::new();
    for attempt in 1..=attempts {
        limiter.acquire().await;
        let response = transport.execute(ApiRequest::get(url)).await.map_err(|e| {
            tracing::error!(url = %url, attempt, "Error fetching data: {}", e);
            e
        })?;
        tracing::debug!(url = %url, attempt, status = response.status, "paced request done");
        statuses.push(response.status);
    }
    Ok(statuses)
}
