//! Fetch a set of endpoints sequentially or concurrently, and talk to the
//! placeholder JSON API.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use fanfetch_core::{default_endpoints, BatchFetcher, ReqwestFetcher, Strategy, TracingLog};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let batch = BatchFetcher::new(Arc::new(ReqwestFetcher::new()?), Arc::new(TracingLog));
//! let endpoints = default_endpoints(fanfetch_core::DEFAULT_BASE_URL);
//! let took = batch.run_timed(Strategy::Queue, &endpoints).await;
//! println!("{}", fanfetch_common_log::spans::took_line(Strategy::Queue.operation_name(), took));
//! # Ok(())
//! # }
//! ```

pub mod endpoint;
pub mod fetch;
pub mod log;
pub mod strategy;
pub mod todo;

pub use endpoint::{default_endpoints, Endpoint, DEFAULT_BASE_URL, DEFAULT_RESOURCES};
pub use fetch::{Fetch, FetchError, FetchResult, ReqwestFetcher};
pub use log::{FetchLog, TracingLog};
pub use strategy::{BatchFetcher, Strategy};
pub use todo::{ApiError, CreatePost, Todo, TodoClient, TodoSummary};
