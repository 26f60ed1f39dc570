use fanfetch_common_http::{
    fetch_with_backoff, headers, parse_json, ApiRequest, FormBody, HttpClient, HttpConfig,
    HttpError, JsonBody, RequestBuilder, RetryPolicy,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Post {
    #[serde(rename = "userId")]
    user_id: u32,
    title: String,
}

fn fast_client() -> HttpClient {
    HttpClient::with_config(HttpConfig {
        request_timeout: Duration::from_millis(500),
        ..HttpConfig::default()
    })
    .expect("client")
}

#[tokio::test]
async fn test_get_does_not_validate_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;

    let client = fast_client();
    let response = client.get(&format!("{}/missing", server.uri())).await.unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let err = HttpClient::check_response(response).await.unwrap_err();
    assert!(matches!(err, HttpError::ClientError { status: 404, ref body } if body == "nope"));
}

#[tokio::test]
async fn test_check_response_reads_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let response = fast_client().get(&server.uri()).await.unwrap();
    let err = HttpClient::check_response(response).await.unwrap_err();
    assert!(matches!(
        err,
        HttpError::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(7)
    ));
}

#[tokio::test]
async fn test_post_json_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", headers::CONTENT_TYPE_JSON))
        .and(body_json(serde_json::json!({"userId": 1, "title": "foo"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "userId": 1,
            "title": "foo"
        })))
        .mount(&server)
        .await;

    let client = fast_client();
    let post = Post { user_id: 1, title: "foo".to_string() };
    let response = client
        .post_json(&format!("{}/posts", server.uri()), &post)
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let echoed: Post = parse_json(response).await.unwrap();
    assert_eq!(echoed, post);
}

#[tokio::test]
async fn test_execute_with_builder_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", headers::CONTENT_TYPE_JSON))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .mount(&server)
        .await;

    let builder = RequestBuilder::new().base_url(server.uri()).bearer_auth("secret-token");
    let body = JsonBody(Post { user_id: 2, title: "bar".to_string() });
    let request = ApiRequest::post_json(builder.url("/posts"), &body)
        .unwrap()
        .headers(builder.headers().clone());

    let response = fast_client().execute(request).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(response.text(), "created");
}

#[tokio::test]
async fn test_post_form_put_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .and(header("content-type", headers::CONTENT_TYPE_FORM))
        .and(body_string("firstName=Roger&lastName=Smith"))
        .respond_with(ResponseTemplate::new(201).set_body_string("form ok"))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/todos/1"))
        .and(body_string(r#"{"title":"updated"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_string("put ok"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/posts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = fast_client();
    let form = FormBody::new().field("firstName", "Roger").field("lastName", "Smith");

    let posted = client.post_form(&format!("{}/posts", server.uri()), &form).await.unwrap();
    assert_eq!((posted.status, posted.text().as_str()), (201, "form ok"));

    let put = client
        .put_bytes(&format!("{}/todos/1", server.uri()), r#"{"title":"updated"}"#)
        .await
        .unwrap();
    assert_eq!((put.status, put.text().as_str()), (200, "put ok"));

    let deleted = client.delete(&format!("{}/posts/1", server.uri())).await.unwrap();
    assert_eq!((deleted.status, deleted.text().as_str()), (200, "{}"));
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = fast_client().execute(ApiRequest::get(server.uri())).await.unwrap_err();
    assert!(matches!(err, HttpError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // Bind then drop a listener so the port is very likely closed.
    let uri = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let err = fast_client().execute(ApiRequest::get(uri)).await.unwrap_err();
    assert!(matches!(err, HttpError::Request(_) | HttpError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn test_backoff_against_server() {
    let server = MockServer::start().await;
    // Mocks match in mount order: two 429s, then the fallback 200.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("finally"))
        .mount(&server)
        .await;

    let policy = RetryPolicy {
        max_attempts: 5,
        step: Duration::from_millis(10),
    };
    let body = fetch_with_backoff(&fast_client(), &format!("{}/flaky", server.uri()), &policy)
        .await
        .unwrap();

    assert_eq!(&body[..], b"finally");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
