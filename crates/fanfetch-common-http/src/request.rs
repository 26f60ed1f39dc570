//! HTTP request types and builders.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

/// Common HTTP headers.
pub mod headers {
    pub const CONTENT_TYPE_JSON: &str = "application/json";
    pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
}

/// Collects headers and a base URL shared by a family of requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    headers: HeaderMap,
    base_url: Option<String>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
            base_url: None,
        }
    }

    /// Set the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Add a header. Invalid names or values are skipped.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_ref()),
            HeaderValue::try_from(value.as_ref()),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Add bearer token authorization.
    pub fn bearer_auth(mut self, token: impl AsRef<str>) -> Self {
        if let Ok(mut value) = HeaderValue::try_from(format!("Bearer {}", token.as_ref())) {
            value.set_sensitive(true);
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Add HTTP basic authorization.
    pub fn basic_auth(mut self, username: impl AsRef<str>, password: impl AsRef<str>) -> Self {
        let encoded = STANDARD.encode(format!("{}:{}", username.as_ref(), password.as_ref()));
        if let Ok(mut value) = HeaderValue::try_from(format!("Basic {}", encoded)) {
            value.set_sensitive(true);
            self.headers.insert(AUTHORIZATION, value);
        }
        self
    }

    /// Set content type to JSON.
    pub fn json_content(self) -> Self {
        self.header(CONTENT_TYPE.as_str(), headers::CONTENT_TYPE_JSON)
    }

    /// Set content type to url-encoded form.
    pub fn form_content(self) -> Self {
        self.header(CONTENT_TYPE.as_str(), headers::CONTENT_TYPE_FORM)
    }

    /// Get the built headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Build the URL.
    pub fn url(&self, path: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }

    /// Start a request against `path` carrying these headers.
    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.url(path)).headers(self.headers.clone())
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A fully described request, independent of any client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a request with no headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// A bare GET.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// A POST carrying a JSON body.
    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &JsonBody<T>) -> Result<Self, serde_json::Error> {
        Ok(Self::new(Method::POST, url)
            .content_type(headers::CONTENT_TYPE_JSON)
            .body(body.to_bytes()?))
    }

    /// A POST carrying a url-encoded form.
    pub fn post_form(url: impl Into<String>, form: &FormBody) -> Self {
        Self::new(Method::POST, url)
            .content_type(headers::CONTENT_TYPE_FORM)
            .body(form.encode())
    }

    /// Merge in extra headers, overriding existing ones.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn content_type(mut self, value: &'static str) -> Self {
        self.headers.insert(CONTENT_TYPE, HeaderValue::from_static(value));
        self
    }
}

/// JSON request body wrapper.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T: Serialize> JsonBody<T> {
    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(&self.0)
    }

    /// Serialize to JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }
}

/// Ordered `application/x-www-form-urlencoded` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    pairs: Vec<(String, String)>,
}

impl FormBody {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode the fields in insertion order.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormBody {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    #[derive(Serialize)]
    struct NewPost {
        #[serde(rename = "userId")]
        user_id: u32,
        title: String,
    }

    #[test]
    fn test_request_builder_url() {
        let builder = RequestBuilder::new().base_url("https://jsonplaceholder.typicode.com");
        assert_eq!(builder.url("/todos/1"), "https://jsonplaceholder.typicode.com/todos/1");
    }

    #[test]
    fn test_request_builder_url_trailing_slash() {
        let builder = RequestBuilder::new().base_url("https://jsonplaceholder.typicode.com/");
        assert_eq!(builder.url("/posts"), "https://jsonplaceholder.typicode.com/posts");
    }

    #[test]
    fn test_request_builder_no_base_url() {
        assert_eq!(RequestBuilder::new().url("/posts"), "/posts");
    }

    #[test]
    fn test_bearer_auth() {
        let builder = RequestBuilder::new().bearer_auth("token123");
        let auth = builder.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Bearer token123");
        assert!(auth.is_sensitive());
    }

    #[test]
    fn test_basic_auth() {
        let builder = RequestBuilder::new().basic_auth("Aladdin", "open sesame");
        let auth = builder.headers().get(AUTHORIZATION).unwrap();
        assert_eq!(auth.to_str().unwrap(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn test_content_types() {
        let json = RequestBuilder::new().json_content();
        assert_eq!(json.headers().get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_JSON);

        let form = RequestBuilder::new().form_content();
        assert_eq!(form.headers().get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_FORM);
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let builder = RequestBuilder::new().header("bad header name", "value");
        assert!(builder.headers().is_empty());
    }

    #[test]
    fn test_builder_request_carries_headers() {
        let request = RequestBuilder::new()
            .base_url("https://api.example.com")
            .header("X-Trace", "abc")
            .request(Method::DELETE, "/posts/1");

        assert_eq!(request.method, Method::DELETE);
        assert_eq!(request.url, "https://api.example.com/posts/1");
        assert_eq!(request.headers.get("X-Trace").unwrap(), "abc");
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_json_request() {
        let body = JsonBody(NewPost {
            user_id: 1,
            title: "Good Request".to_string(),
        });
        let request = ApiRequest::post_json("https://api.example.com/posts", &body).unwrap();

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_JSON);
        let parsed: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(parsed["userId"], 1);
        assert_eq!(parsed["title"], "Good Request");
    }

    #[test]
    fn test_form_body_encoding() {
        let form = FormBody::new()
            .field("firstName", "Roger")
            .field("lastName", "Smith & Sons");
        assert_eq!(form.len(), 2);
        assert_eq!(form.encode(), "firstName=Roger&lastName=Smith+%26+Sons");
    }

    #[test]
    fn test_form_body_from_iter() {
        let form: FormBody = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(form.encode(), "a=1&b=2");
        assert!(FormBody::new().is_empty());
    }

    #[test]
    fn test_post_form_request() {
        let request = ApiRequest::post_form("https://api.example.com/posts", &FormBody::new().field("k", "v"));
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), headers::CONTENT_TYPE_FORM);
        assert_eq!(request.body.unwrap(), Bytes::from_static(b"k=v"));
    }
}
