//! HTTP client utilities for fanfetch.

pub mod client;
pub mod rate_limit;
pub mod request;
pub mod response;
pub mod retry;
pub mod transport;

pub use client::{build_client, parse_url, HttpClient, HttpConfig, HttpError, DEFAULT_REQUEST_TIMEOUT};
pub use rate_limit::{fetch_rate_limited, RateLimiter};
pub use request::{headers, ApiRequest, FormBody, JsonBody, RequestBuilder};
pub use response::{parse_json, parse_raw_json, ResponseError};
pub use retry::{fetch_with_backoff, RetryPolicy, RetryReason};
pub use transport::{RawResponse, Transport};

pub use reqwest::Method;
