//! Test doubles for fanfetch crates.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use fanfetch_core::{Endpoint, Fetch, FetchError, FetchLog};

#[derive(Debug, Clone)]
enum Script {
    Body(Bytes),
    Fail(FetchError),
    Panic,
}

/// A [`Fetch`] with scripted per-endpoint behaviour.
///
/// Unscripted endpoints answer `"ok"`. Every call sleeps for the configured
/// delay on tokio's clock first, so paused-time tests control latency.
#[derive(Debug, Default)]
pub struct MockFetcher {
    scripts: HashMap<Endpoint, Script>,
    delays: HashMap<Endpoint, Duration>,
    default_delay: Duration,
    calls: Mutex<Vec<Endpoint>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay applied to every endpoint without its own delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn delay(mut self, endpoint: impl Into<Endpoint>, delay: Duration) -> Self {
        self.delays.insert(endpoint.into(), delay);
        self
    }

    pub fn respond(mut self, endpoint: impl Into<Endpoint>, body: impl Into<Bytes>) -> Self {
        self.scripts.insert(endpoint.into(), Script::Body(body.into()));
        self
    }

    pub fn fail(mut self, endpoint: impl Into<Endpoint>, error: FetchError) -> Self {
        self.scripts.insert(endpoint.into(), Script::Fail(error));
        self
    }

    /// Make the fetch task for `endpoint` panic.
    pub fn panic_on(mut self, endpoint: impl Into<Endpoint>) -> Self {
        self.scripts.insert(endpoint.into(), Script::Panic);
        self
    }

    /// Every endpoint fetched so far, in invocation order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &Endpoint) -> usize {
        self.calls.lock().unwrap().iter().filter(|e| *e == endpoint).count()
    }

    /// Most fetches observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for MockFetcher {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Bytes, FetchError> {
        self.calls.lock().unwrap().push(endpoint.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.get(endpoint).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.scripts.get(endpoint) {
            Some(Script::Body(body)) => Ok(body.clone()),
            Some(Script::Fail(error)) => Err(error.clone()),
            Some(Script::Panic) => panic!("scripted panic for {endpoint}"),
            None => Ok(Bytes::from_static(b"ok")),
        }
    }
}

/// One captured [`FetchLog`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Failed { endpoint: Endpoint, error: FetchError },
    Succeeded { endpoint: Endpoint, body: Bytes },
}

/// A [`FetchLog`] that keeps every call for later assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<(Endpoint, FetchError)> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Failed { endpoint, error } => Some((endpoint, error)),
                LogEntry::Succeeded { .. } => None,
            })
            .collect()
    }

    pub fn successes(&self) -> Vec<(Endpoint, Bytes)> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Succeeded { endpoint, body } => Some((endpoint, body)),
                LogEntry::Failed { .. } => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FetchLog for RecordingLog {
    fn fetch_failed(&self, endpoint: &Endpoint, error: &FetchError) {
        self.entries.lock().unwrap().push(LogEntry::Failed {
            endpoint: endpoint.clone(),
            error: error.clone(),
        });
    }

    fn fetch_succeeded(&self, endpoint: &Endpoint, body: &[u8]) {
        self.entries.lock().unwrap().push(LogEntry::Succeeded {
            endpoint: endpoint.clone(),
            body: Bytes::copy_from_slice(body),
        });
    }
}

/// Endpoints `https://mock.test/<name>` for each name.
pub fn endpoints(names: &[&str]) -> Vec<Endpoint> {
    names
        .iter()
        .map(|name| Endpoint::from(format!("https://mock.test/{name}")))
        .collect()
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
