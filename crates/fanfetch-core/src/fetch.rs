//! The single-endpoint fetch operation.

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use fanfetch_common_http::{HttpClient, HttpConfig, HttpError, DEFAULT_REQUEST_TIMEOUT};

use crate::endpoint::Endpoint;

/// Why fetching one endpoint failed.
///
/// Every variant is local to its endpoint; the strategies log it and move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("cannot build request for {url:?}: {message}")]
    RequestConstruction { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("failed to read body from {url}: {message}")]
    BodyRead { url: String, message: String },
}

impl FetchError {
    pub fn request_construction(endpoint: &Endpoint, message: impl Into<String>) -> Self {
        Self::RequestConstruction {
            url: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(endpoint: &Endpoint, message: impl Into<String>) -> Self {
        Self::Transport {
            url: endpoint.to_string(),
            message: message.into(),
        }
    }

    pub fn body_read(endpoint: &Endpoint, message: impl Into<String>) -> Self {
        Self::BodyRead {
            url: endpoint.to_string(),
            message: message.into(),
        }
    }

    fn from_http(endpoint: &Endpoint, error: HttpError) -> Self {
        match error {
            HttpError::InvalidUrl { message, .. } => Self::request_construction(endpoint, message),
            HttpError::Body(e) => Self::body_read(endpoint, e.to_string()),
            other => Self::transport(endpoint, other.to_string()),
        }
    }
}

/// Outcome of fetching one endpoint, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub endpoint: Endpoint,
    pub outcome: Result<Bytes, FetchError>,
}

impl FetchResult {
    pub fn new(endpoint: Endpoint, outcome: Result<Bytes, FetchError>) -> Self {
        Self { endpoint, outcome }
    }

    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Fetch one endpoint's body.
///
/// Implementations must not retry and must not judge the status code: any
/// response whose body could be read is a success.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Bytes, FetchError>;
}

/// [`Fetch`] over HTTP GET with a bounded total timeout.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: HttpClient,
}

impl ReqwestFetcher {
    /// A fetcher with the default 3 second timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = HttpClient::with_config(HttpConfig {
            request_timeout: timeout,
            ..HttpConfig::default()
        })?;
        Ok(Self::from_client(client))
    }

    /// Wrap an existing client. Its configured timeout applies as-is.
    pub fn from_client(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for ReqwestFetcher {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Bytes, FetchError> {
        let response = self
            .client
            .get(endpoint.as_str())
            .await
            .map_err(|e| FetchError::from_http(endpoint, e))?;

        // Dropping the response on error releases the connection.
        response
            .bytes()
            .await
            .map_err(|e| FetchError::body_read(endpoint, e.to_string()))
    }
}
