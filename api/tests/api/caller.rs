use api::call_api;
use api::domain::request::{ApiRequest, HttpMethod};
use api::error::ApiError;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string, method, path, query_param};
use wiremock::{Match, Mock, MockServer, ResponseTemplate};

use crate::helpers::get_request;

// wiremock matchers mostly work on the path; this checks the full
// request URL against an expected one, query string included.
pub struct MockUrlMatcher(String);
impl Match for MockUrlMatcher {
    fn matches(&self, request: &wiremock::Request) -> bool {
        request.url == Url::parse(&self.0).unwrap()
    }
}

#[tokio::test]
async fn empty_url_fails_validation_before_any_call() {
    let client = reqwest::Client::new();
    let request = ApiRequest::default();

    let result = call_api(&client, &request).await;

    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn get_data_is_flattened_into_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("page", "2"))
        .and(query_param("active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = ApiRequest {
        url: format!("{}/items", server.uri()),
        method: HttpMethod::GET,
        data: json!({"page": "2", "active": true}),
    };

    let body = call_api(&client, &request).await.unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn get_with_empty_data_leaves_url_unmodified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(MockUrlMatcher(format!("{}/plain", server.uri())))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"x": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = get_request(format!("{}/plain", server.uri()));

    let body = call_api(&client, &request).await.unwrap();
    assert_eq!(body, json!({"x": 1}));
}

#[tokio::test]
async fn post_sends_data_as_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_json(json!({"name": "diff"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"created": true})))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = ApiRequest {
        url: format!("{}/submit", server.uri()),
        method: HttpMethod::POST,
        data: json!({"name": "diff"}),
    };

    let body = call_api(&client, &request).await.unwrap();
    assert_eq!(body, json!({"created": true}));
}

#[tokio::test]
async fn post_string_data_is_sent_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string(r#"{"already":"serialized"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = ApiRequest {
        url: format!("{}/submit", server.uri()),
        method: HttpMethod::POST,
        data: json!(r#"{"already":"serialized"}"#),
    };

    assert!(call_api(&client, &request).await.is_ok());
}

#[tokio::test]
async fn non_2xx_json_body_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "item missing"})))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = get_request(format!("{}/missing", server.uri()));

    let err = call_api(&client, &request).await.unwrap_err();
    match err {
        ApiError::HttpStatus { status, ref message } => {
            assert_eq!(status, 404);
            assert!(message.contains("item missing"));
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_2xx_unparseable_body_falls_back_to_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops, not json"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = get_request(format!("{}/broken", server.uri()));

    let err = call_api(&client, &request).await.unwrap_err();
    match err {
        ApiError::HttpStatus { status, ref message } => {
            assert_eq!(status, 500);
            assert!(message.contains("500 Internal Server Error"));
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn non_json_success_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let request = get_request(format!("{}/html", server.uri()));

    let err = call_api(&client, &request).await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn unreachable_host_is_a_network_error_naming_the_url() {
    let client = reqwest::Client::new();
    // port 9 (discard) is refused on loopback
    let request = get_request(String::from("http://127.0.0.1:9/down"));

    let err = call_api(&client, &request).await.unwrap_err();
    assert!(matches!(err, ApiError::Network { .. }));
    assert!(err.to_string().contains("http://127.0.0.1:9/down"));
}
