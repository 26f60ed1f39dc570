//! Span and timing utilities.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{info_span, Span};

/// Create a span for one batch run of a fetch strategy.
pub fn batch_span(strategy: &str, endpoints: usize) -> Span {
    info_span!("batch", strategy = %strategy, endpoints = endpoints)
}

/// Create a span for the fetch of a single endpoint.
pub fn endpoint_span(url: &str) -> Span {
    info_span!("endpoint", url = %url)
}

/// Wall-clock timer for a named operation.
///
/// Uses tokio's clock, so elapsed time follows `tokio::time::pause` in tests.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Name of the timed operation.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Time elapsed so far.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Complete the timer, record the duration and return it.
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.operation,
            duration_ms = %duration.as_millis(),
            "operation completed"
        );
        duration
    }
}

/// Render the `<operation> took <duration>` line for a finished operation.
pub fn took_line(operation: &str, duration: Duration) -> String {
    format!("{} took {:?}", operation, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    fn with_subscriber<F>(f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let subscriber = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(EnvFilter::new("trace"))
            .finish();

        tracing::subscriber::with_default(subscriber, f);
    }

    #[test]
    fn test_span_nesting() {
        with_subscriber(|| {
            let batch = batch_span("sequential", 5);
            let _guard1 = batch.enter();

            let endpoint = endpoint_span("https://example.com/posts");
            let _guard2 = endpoint.enter();

            tracing::info!("nested operation");
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_follows_paused_clock() {
        let timer = Timer::start("sleepy");
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(timer.operation(), "sleepy");
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }

    #[test]
    fn test_took_line_format() {
        let line = took_line("Sequential Data Fetch Operation", Duration::from_millis(1500));
        assert_eq!(line, "Sequential Data Fetch Operation took 1.5s");
    }
}
