//! Typed client for the placeholder todo/post API.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use fanfetch_common_http::{
    parse_raw_json, ApiRequest, FormBody, HttpError, JsonBody, Method, RawResponse,
    RequestBuilder, ResponseError, Transport,
};

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u32,
    pub id: u32,
    pub title: String,
    pub completed: bool,
}

/// Reduced view of a [`Todo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSummary {
    pub user_id: u32,
    pub id: u32,
    pub completed: bool,
}

/// Payload for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePost {
    pub user_id: u32,
    pub id: u32,
    pub title: String,
    pub body: String,
}

/// API client errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("unexpected status {status}")]
    UnexpectedStatus { status: u16, body: String },

    #[error(transparent)]
    Decode(#[from] ResponseError),

    #[error("failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Client for `/todos` and `/posts` over any [`Transport`].
#[derive(Debug, Clone)]
pub struct TodoClient<T> {
    transport: T,
    requests: RequestBuilder,
}

impl<T: Transport> TodoClient<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            requests: RequestBuilder::new().base_url(base_url),
        }
    }

    /// Send HTTP basic credentials with every request.
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.requests = self.requests.basic_auth(username, password);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `/todos/{id}`. Anything but 200 is an error.
    pub async fn fetch_todo(&self, id: u32) -> Result<Todo, ApiError> {
        let response = self.send(self.requests.request(Method::GET, &todo_path(id))).await?;
        decode_ok(&response)
    }

    /// GET `/todos/{id}`, keeping only the summary fields.
    pub async fn fetch_summary(&self, id: u32) -> Result<TodoSummary, ApiError> {
        let response = self.send(self.requests.request(Method::GET, &todo_path(id))).await?;
        decode_ok(&response)
    }

    /// POST `post` as JSON to `/posts`.
    pub async fn create_post(&self, post: &CreatePost) -> Result<RawResponse, ApiError> {
        let request = ApiRequest::post_json(self.requests.url("/posts"), &JsonBody(post))?
            .headers(self.requests.headers().clone());
        self.send(request).await
    }

    /// POST a url-encoded form to `/posts`.
    pub async fn submit_form(&self, form: &FormBody) -> Result<RawResponse, ApiError> {
        let request = ApiRequest::post_form(self.requests.url("/posts"), form)
            .headers(self.requests.headers().clone());
        self.send(request).await
    }

    /// PUT a raw body to `/todos/{id}`.
    pub async fn replace_todo(&self, id: u32, body: impl Into<Bytes>) -> Result<RawResponse, ApiError> {
        let request = self
            .requests
            .clone()
            .json_content()
            .request(Method::PUT, &todo_path(id))
            .body(body);
        self.send(request).await
    }

    /// DELETE `/posts/{id}`.
    pub async fn delete_post(&self, id: u32) -> Result<RawResponse, ApiError> {
        self.send(self.requests.request(Method::DELETE, &format!("/posts/{id}")))
            .await
    }

    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let method = request.method.clone();
        let url = request.url.clone();
        let response = self.transport.execute(request).await?;
        tracing::debug!(%method, %url, status = response.status, "api call");
        Ok(response)
    }
}

fn todo_path(id: u32) -> String {
    format!("/todos/{id}")
}

fn decode_ok<D: serde::de::DeserializeOwned>(response: &RawResponse) -> Result<D, ApiError> {
    if response.status != 200 {
        return Err(ApiError::UnexpectedStatus {
            status: response.status,
            body: response.text(),
        });
    }
    Ok(parse_raw_json(response)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use mockall::predicate::function;
    use pretty_assertions::assert_eq;

    mock! {
        pub Api {}

        #[async_trait]
        impl Transport for Api {
            async fn execute(&self, request: ApiRequest) -> Result<RawResponse, HttpError>;
        }
    }

    const TODO_JSON: &str =
        r#"{"userId": 1, "id": 1, "title": "delectus aut autem", "completed": false}"#;

    fn client(transport: MockApi) -> TodoClient<MockApi> {
        TodoClient::new(transport, "https://api.test")
    }

    #[tokio::test]
    async fn test_fetch_todo_success() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .with(function(|r: &ApiRequest| {
                r.method == Method::GET && r.url == "https://api.test/todos/1"
            }))
            .times(1)
            .returning(|_| Ok(RawResponse::new(200, TODO_JSON)));

        let todo = client(transport).fetch_todo(1).await.unwrap();
        assert_eq!(
            todo,
            Todo {
                user_id: 1,
                id: 1,
                title: "delectus aut autem".to_string(),
                completed: false,
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_todo_non_200() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .returning(|_| Ok(RawResponse::new(404, "{}")));

        let err = client(transport).fetch_todo(1).await.unwrap_err();
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_todo_bad_json() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .returning(|_| Ok(RawResponse::new(200, "invalid json")));

        let err = client(transport).fetch_todo(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(ResponseError::Parse { status: 200, .. })));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let mut transport = MockApi::new();
        transport.expect_execute().returning(|_| Err(HttpError::Timeout));

        let err = client(transport).fetch_summary(3).await.unwrap_err();
        assert!(matches!(err, ApiError::Http(HttpError::Timeout)));
    }

    #[tokio::test]
    async fn test_fetch_summary_ignores_title() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .returning(|_| Ok(RawResponse::new(200, TODO_JSON)));

        let summary = client(transport).fetch_summary(1).await.unwrap();
        assert_eq!(summary, TodoSummary { user_id: 1, id: 1, completed: false });
    }

    #[tokio::test]
    async fn test_create_post_sends_camel_case_json() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .with(function(|r: &ApiRequest| {
                let body: serde_json::Value =
                    serde_json::from_slice(r.body.as_deref().unwrap_or_default()).unwrap();
                r.method == Method::POST
                    && r.url == "https://api.test/posts"
                    && body["userId"] == 1
                    && body["title"] == "Test Post"
            }))
            .times(1)
            .returning(|_| Ok(RawResponse::new(201, r#"{"id": 101}"#)));

        let post = CreatePost {
            user_id: 1,
            id: 1,
            title: "Test Post".to_string(),
            body: "This is a test post".to_string(),
        };
        let response = client(transport).create_post(&post).await.unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn test_basic_auth_header() {
        let mut transport = MockApi::new();
        transport
            .expect_execute()
            .with(function(|r: &ApiRequest| {
                // base64("user:pass")
                r.headers.get("authorization").and_then(|v| v.to_str().ok())
                    == Some("Basic dXNlcjpwYXNz")
            }))
            .returning(|_| Ok(RawResponse::new(200, "{}")));

        let client = client(transport).with_basic_auth("user", "pass");
        let response = client.delete_post(1).await.unwrap();
        assert_eq!(response.status, 200);
    }
}
