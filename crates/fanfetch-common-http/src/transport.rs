//! Request execution seam.

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::{HttpClient, HttpError};
use crate::request::ApiRequest;

/// A status code plus the fully-read body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    /// Build a response, mostly useful in tests.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Executes requests. API clients depend on this rather than on
/// [`HttpClient`] so they can be driven by a mock.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError>;
}

#[async_trait]
impl Transport for HttpClient {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError> {
        HttpClient::execute(self, request).await
    }
}
