//! HTTP response decoding.

use serde::de::DeserializeOwned;

use crate::transport::RawResponse;

/// Parse a JSON response.
pub async fn parse_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ResponseError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(ResponseError::Read)?;
    decode_json(status, &bytes)
}

/// Decode an already-read response body as JSON.
pub fn parse_raw_json<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ResponseError> {
    decode_json(response.status, &response.body)
}

fn decode_json<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<T, ResponseError> {
    serde_json::from_slice(bytes).map_err(|e| ResponseError::Parse {
        status,
        body: String::from_utf8_lossy(bytes).to_string(),
        source: e,
    })
}

/// Response parsing errors.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("failed to read response body: {0}")]
    Read(#[source] reqwest::Error),

    #[error("failed to parse JSON (status {status}): {source}")]
    Parse {
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}
