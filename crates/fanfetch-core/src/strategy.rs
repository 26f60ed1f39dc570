//! The three ways of fetching a batch of endpoints.
//!
//! All of them run for their side effects: every outcome is handed to the
//! [`FetchLog`], and no failure stops the rest of the batch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::Instrument;

use fanfetch_common_async::{join_handles, CompletionBarrier, PoolConfig, TaskPool};
use fanfetch_common_log::spans::{batch_span, endpoint_span, Timer};

use crate::endpoint::Endpoint;
use crate::fetch::{Fetch, FetchResult};
use crate::log::FetchLog;

/// Batch fetch strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One endpoint at a time, in list order.
    Sequential,
    /// One task per endpoint; the caller waits on a completion barrier.
    Barrier,
    /// One task per endpoint writing into a result queue drained by the caller.
    Queue,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Sequential, Strategy::Barrier, Strategy::Queue];

    /// Human-readable name used in the timing line.
    pub fn operation_name(self) -> &'static str {
        match self {
            Strategy::Sequential => "Sequential Data Fetch Operation",
            Strategy::Barrier => "Concurrent Data Fetch Operation With Completion Barrier",
            Strategy::Queue => "Concurrent Data Fetch Operation With Result Queue",
        }
    }

    /// Short identifier used in spans.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Sequential => "sequential",
            Strategy::Barrier => "barrier",
            Strategy::Queue => "queue",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs batches with a shared fetcher, log and task pool.
#[derive(Clone)]
pub struct BatchFetcher {
    fetcher: Arc<dyn Fetch>,
    log: Arc<dyn FetchLog>,
    pool: TaskPool,
}

impl BatchFetcher {
    pub fn new(fetcher: Arc<dyn Fetch>, log: Arc<dyn FetchLog>) -> Self {
        Self {
            fetcher,
            log,
            pool: TaskPool::unbounded(),
        }
    }

    /// Cap how many fetches the concurrent strategies keep in flight.
    pub fn with_pool(mut self, config: PoolConfig) -> Self {
        self.pool = TaskPool::new(config);
        self
    }

    pub fn pool(&self) -> &TaskPool {
        &self.pool
    }

    /// Run `strategy` over `endpoints` and return how long it took.
    pub async fn run_timed(&self, strategy: Strategy, endpoints: &[Endpoint]) -> Duration {
        let timer = Timer::start(strategy.operation_name());
        self.run(strategy, endpoints)
            .instrument(batch_span(strategy.as_str(), endpoints.len()))
            .await;
        timer.finish()
    }

    pub async fn run(&self, strategy: Strategy, endpoints: &[Endpoint]) {
        match strategy {
            Strategy::Sequential => self.sequential(endpoints).await,
            Strategy::Barrier => self.barrier(endpoints).await,
            Strategy::Queue => self.queue(endpoints).await,
        }
    }

    /// Fetch each endpoint in order, one at a time.
    pub async fn sequential(&self, endpoints: &[Endpoint]) {
        for endpoint in endpoints {
            let result = self
                .fetcher
                .fetch(endpoint)
                .instrument(endpoint_span(endpoint.as_str()))
                .await;
            report(self.log.as_ref(), &FetchResult::new(endpoint.clone(), result));
        }
    }

    /// Fetch all endpoints concurrently and wait on a completion barrier.
    pub async fn barrier(&self, endpoints: &[Endpoint]) {
        let barrier = CompletionBarrier::new();
        // Registered before any spawn so wait() cannot observe zero early.
        barrier.add(endpoints.len());

        let handles = endpoints
            .iter()
            .cloned()
            .map(|endpoint| {
                let done = barrier.done_on_drop();
                let fetcher = Arc::clone(&self.fetcher);
                let log = Arc::clone(&self.log);
                let span = endpoint_span(endpoint.as_str());
                self.pool.spawn(
                    async move {
                        let _done = done;
                        let result = fetcher.fetch(&endpoint).await;
                        report(log.as_ref(), &FetchResult::new(endpoint, result));
                    }
                    .instrument(span),
                )
            })
            .collect::<Vec<_>>();

        barrier.wait().await;
        reap(handles).await;
    }

    /// Fetch all endpoints concurrently, funnel results through a queue and
    /// drain it on the calling task.
    pub async fn queue(&self, endpoints: &[Endpoint]) {
        if endpoints.is_empty() {
            return;
        }

        // One slot per producer, so no send ever waits.
        let (tx, mut rx) = mpsc::channel::<FetchResult>(endpoints.len());
        let barrier = CompletionBarrier::new();
        barrier.add(endpoints.len());

        let mut handles = endpoints
            .iter()
            .cloned()
            .map(|endpoint| {
                let done = barrier.done_on_drop();
                let tx = tx.clone();
                let fetcher = Arc::clone(&self.fetcher);
                let span = endpoint_span(endpoint.as_str());
                self.pool.spawn(
                    async move {
                        let _done = done;
                        let result = fetcher.fetch(&endpoint).await;
                        if tx.send(FetchResult::new(endpoint, result)).await.is_err() {
                            tracing::warn!("result queue closed before send");
                        }
                    }
                    .instrument(span),
                )
            })
            .collect::<Vec<_>>();

        // The closer owns the last original sender and drops it once every
        // producer has signaled, which ends the drain below.
        let closer = barrier.clone();
        handles.push(tokio::spawn(async move {
            closer.wait().await;
            drop(tx);
            tracing::trace!("result queue closed");
        }));

        let mut drained = 0usize;
        while let Some(result) = rx.recv().await {
            drained += 1;
            report(self.log.as_ref(), &result);
        }
        tracing::debug!(drained, "result queue drained");

        reap(handles).await;
    }
}

impl fmt::Debug for BatchFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchFetcher")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

fn report(log: &dyn FetchLog, result: &FetchResult) {
    match &result.outcome {
        Ok(body) => log.fetch_succeeded(&result.endpoint, body),
        Err(e) => log.fetch_failed(&result.endpoint, e),
    }
}

async fn reap(handles: Vec<tokio::task::JoinHandle<()>>) {
    for outcome in join_handles(handles).await {
        if let Err(e) = outcome {
            tracing::error!("fetch task failed: {}", e);
        }
    }
}
