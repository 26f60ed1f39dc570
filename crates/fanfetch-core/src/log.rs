//! Where per-endpoint outcomes are reported.

use crate::endpoint::Endpoint;
use crate::fetch::FetchError;

/// Sink for per-endpoint fetch outcomes.
///
/// Strategies receive one as a trait object, so tests can capture what
/// would otherwise go to the tracing subscriber.
pub trait FetchLog: Send + Sync {
    /// A fetch failed. Called exactly once per failed endpoint.
    fn fetch_failed(&self, endpoint: &Endpoint, error: &FetchError);

    /// A fetch returned a body.
    fn fetch_succeeded(&self, endpoint: &Endpoint, body: &[u8]) {
        let _ = (endpoint, body);
    }
}

/// Reports through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl FetchLog for TracingLog {
    fn fetch_failed(&self, endpoint: &Endpoint, error: &FetchError) {
        tracing::error!(endpoint = %endpoint, "Error fetching data: {}", error);
    }

    fn fetch_succeeded(&self, endpoint: &Endpoint, body: &[u8]) {
        tracing::debug!(endpoint = %endpoint, bytes = body.len(), "fetched");
    }
}
