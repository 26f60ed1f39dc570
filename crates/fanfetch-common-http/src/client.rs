//! HTTP client configuration.

use bytes::Bytes;
use reqwest::{Client, ClientBuilder, Method};
use std::time::Duration;

use crate::request::{ApiRequest, FormBody};
use crate::transport::RawResponse;

/// Total request timeout used by every fanfetch tutorial client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Total request timeout, covering headers and body.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("fanfetch/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
        }
    }
}

/// Build a configured HTTP client.
pub fn build_client(config: HttpConfig) -> Result<Client, HttpError> {
    let mut builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout.min(config.request_timeout))
        .timeout(config.request_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host);

    if config.gzip {
        builder = builder.gzip(true);
    }

    builder.build().map_err(HttpError::ClientBuild)
}

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("invalid request URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("rate limited (retry after {retry_after:?})")]
    RateLimited { retry_after: Option<Duration> },

    #[error("server error: {status}")]
    ServerError { status: u16, body: String },

    #[error("client error: {status}")]
    ClientError { status: u16, body: String },

    #[error("gave up after {attempts} attempts (last status {last_status:?})")]
    RetriesExhausted { attempts: u32, last_status: Option<u16> },
}

impl From<reqwest::Error> for HttpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            HttpError::Timeout
        } else if e.is_body() || e.is_decode() {
            HttpError::Body(e)
        } else {
            HttpError::Request(e)
        }
    }
}

/// Parse and validate a request URL.
pub fn parse_url(url: &str) -> Result<url::Url, HttpError> {
    let parsed = url::Url::parse(url).map_err(|e| HttpError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(HttpError::InvalidUrl {
            url: url.to_string(),
            message: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Shared HTTP client for the application.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default config.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HTTP client with custom config.
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        let inner = build_client(config)?;
        Ok(Self { inner })
    }

    /// Get the inner reqwest client.
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Make a GET request.
    ///
    /// The status code is not checked; see [`HttpClient::check_response`].
    pub async fn get(&self, url: &str) -> Result<reqwest::Response, HttpError> {
        let url = parse_url(url)?;
        tracing::debug!("Making GET request to: {}", url);
        let response = self.inner.get(url.clone()).send().await.map_err(HttpError::from)?;
        tracing::debug!("GET response: {} {}", response.status(), url);
        Ok(response)
    }

    /// Make a POST request with JSON body.
    pub async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, HttpError> {
        let url = parse_url(url)?;
        tracing::debug!("Making POST request to: {}", url);
        let response = self
            .inner
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(HttpError::from)?;
        tracing::debug!("POST response: {} {}", response.status(), url);
        Ok(response)
    }

    /// Make a POST request with a url-encoded form body.
    pub async fn post_form(&self, url: &str, form: &FormBody) -> Result<RawResponse, HttpError> {
        self.execute(ApiRequest::post_form(url, form)).await
    }

    /// Make a PUT request with a raw body.
    pub async fn put_bytes(&self, url: &str, body: impl Into<Bytes>) -> Result<RawResponse, HttpError> {
        self.execute(ApiRequest::new(Method::PUT, url).body(body)).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, url: &str) -> Result<RawResponse, HttpError> {
        self.execute(ApiRequest::new(Method::DELETE, url)).await
    }

    /// Send a prepared request and read the whole body.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError> {
        let url = parse_url(&request.url)?;
        tracing::debug!("Making {} request to: {}", request.method, url);

        let mut builder = self
            .inner
            .request(request.method.clone(), url.clone())
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(HttpError::from)?;
        let status = response.status();
        tracing::debug!("{} response: {} {}", request.method, status, url);

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout
            } else {
                HttpError::Body(e)
            }
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// Check response status and convert errors.
    pub async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, HttpError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);

            return Err(HttpError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();

        if status.is_server_error() {
            Err(HttpError::ServerError {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(HttpError::ClientError {
                status: status.as_u16(),
                body,
            })
        }
    }
}
