//! Bounded task pool for fan-out.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};

/// Task pool configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum number of tasks running at once (`None` = unlimited).
    pub max_in_flight: Option<usize>,
}

impl PoolConfig {
    /// No concurrency cap.
    pub fn unbounded() -> Self {
        Self { max_in_flight: None }
    }

    /// Cap concurrency at `n` (values below 1 are treated as 1).
    pub fn bounded(n: usize) -> Self {
        Self {
            max_in_flight: Some(n.max(1)),
        }
    }
}

/// Errors from joining pooled tasks.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("task panicked: {0}")]
    Panicked(String),

    #[error("task was cancelled")]
    Cancelled,
}

impl From<JoinError> for PoolError {
    fn from(e: JoinError) -> Self {
        if e.is_cancelled() {
            return PoolError::Cancelled;
        }
        let message = match e.try_into_panic() {
            Ok(payload) => payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic payload".to_string()),
            Err(e) => e.to_string(),
        };
        PoolError::Panicked(message)
    }
}

/// Spawns tasks onto the tokio runtime, optionally gated by a semaphore.
///
/// Every task is spawned immediately; with a cap, tasks beyond the limit
/// park on the semaphore until a running one finishes.
#[derive(Debug, Clone)]
pub struct TaskPool {
    gate: Option<Arc<Semaphore>>,
    cap: Option<usize>,
}

impl TaskPool {
    /// Create a pool with the given configuration.
    pub fn new(config: PoolConfig) -> Self {
        let cap = config.max_in_flight.map(|n| n.max(1));
        Self {
            gate: cap.map(|n| Arc::new(Semaphore::new(n))),
            cap,
        }
    }

    /// Create a pool with no concurrency cap.
    pub fn unbounded() -> Self {
        Self::new(PoolConfig::unbounded())
    }

    /// Concurrency cap, if any.
    pub fn max_in_flight(&self) -> Option<usize> {
        self.cap
    }

    /// Spawn one task.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let gate = self.gate.clone();
        tokio::spawn(async move {
            let _permit = match gate {
                Some(sem) => sem.acquire_owned().await.ok(),
                None => None,
            };
            future.await
        })
    }

    /// Spawn one task per future, preserving input order in the handles.
    pub fn spawn_all<I, F>(&self, futures: I) -> Vec<JoinHandle<F::Output>>
    where
        I: IntoIterator<Item = F>,
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        futures.into_iter().map(|f| self.spawn(f)).collect()
    }

    /// Spawn every future and wait for all of them.
    ///
    /// Outputs are returned in input order. A panicking task yields an
    /// error in its slot without affecting the others.
    pub async fn run_all<I, F>(&self, futures: I) -> Vec<Result<F::Output, PoolError>>
    where
        I: IntoIterator<Item = F>,
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        join_handles(self.spawn_all(futures)).await
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Await a set of handles, converting join failures into [`PoolError`].
pub async fn join_handles<T>(handles: Vec<JoinHandle<T>>) -> Vec<Result<T, PoolError>> {
    futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.map_err(PoolError::from))
        .collect()
}
