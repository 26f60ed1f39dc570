//! Async runtime utilities and fan-out primitives.

use tokio::runtime::{Builder, Runtime};

pub mod barrier;
pub mod pool;

pub use barrier::{CompletionBarrier, DoneGuard};
pub use pool::{join_handles, PoolConfig, PoolError, TaskPool};

/// Configuration for the fanfetch runtime.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads (0 = num_cpus).
    pub worker_threads: usize,
    /// Thread name prefix.
    pub thread_name: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            thread_name: "fanfetch".to_string(),
        }
    }
}

/// Build a multi-threaded Tokio runtime with I/O and timers enabled.
pub fn build_runtime(config: RuntimeConfig) -> std::io::Result<Runtime> {
    let mut builder = Builder::new_multi_thread();

    if config.worker_threads > 0 {
        builder.worker_threads(config.worker_threads);
    }

    builder.thread_name(&config.thread_name).enable_all().build()
}
