use auto_federation::error::ResolverError;
use auto_federation::forward;
use auto_federation::graphql;
use auto_federation::ForwardClient;
use auto_federation::ForwardRequest;
use auto_federation::Forwarder;
use pretty_assertions::assert_eq;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::AUTHORIZATION;
use serde_json::json;
use url::Url;
use wiremock::matchers::body_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

use crate::support::mock_query;
use crate::support::object;
use crate::support::url;
use crate::support::GRAPHQL_PATH;

const USER_QUERY: &str = "query User($id: ID!) { user(id: $id) { id name } }";

fn origin_url(server: &MockServer) -> Url {
    Url::parse(&url(server)).unwrap()
}

#[tokio::test]
async fn forward_sends_headers_query_and_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("authorization", "Bearer secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "query": USER_QUERY, "variables": { "id": "1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": { "id": "1", "name": "Jimmy" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
    let data = forward(
        ForwardRequest::new(origin_url(&server), USER_QUERY)
            .with_headers(headers)
            .with_variables(object(json!({ "id": "1" }))),
    )
    .await
    .unwrap();

    assert_eq!(data, json!({ "user": { "id": "1", "name": "Jimmy" } }));
}

#[tokio::test]
async fn forward_raises_remote_errors() {
    let server = MockServer::start().await;
    mock_query(
        &server,
        USER_QUERY,
        json!({ "data": null, "errors": [{ "message": "no such user", "path": ["user"] }] }),
    )
    .await;

    let error = forward(ForwardRequest::new(origin_url(&server), USER_QUERY))
        .await
        .unwrap_err();
    let mut expected = graphql::Error::new("no such user");
    expected.path = Some(vec![json!("user")]);
    assert_eq!(error, ResolverError::Remote { errors: vec![expected] });
}

#[tokio::test]
async fn forward_client_is_bound_to_its_origin() {
    let server = MockServer::start().await;
    mock_query(
        &server,
        USER_QUERY,
        json!({ "data": { "user": { "id": "2", "name": "Kim" } } }),
    )
    .await;

    let client = ForwardClient::new(origin_url(&server));
    assert_eq!(client.url(), &origin_url(&server));
    let data = client
        .forward(
            HeaderMap::new(),
            USER_QUERY,
            Some(object(json!({ "id": "2" }))),
        )
        .await
        .unwrap();
    assert_eq!(data["user"]["name"], "Kim");

    let bound = Forwarder::new().bind(origin_url(&server));
    let data = bound.forward(HeaderMap::new(), USER_QUERY, None).await.unwrap();
    assert_eq!(data["user"]["id"], "2");
}

#[tokio::test]
async fn graphql_request_turns_failures_into_error_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/malformed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/failing"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;
    let forwarder = Forwarder::new();
    let request = graphql::Request::new("{ hello }");

    let malformed = Url::parse(&format!("{}/malformed", server.uri())).unwrap();
    let response = forwarder
        .graphql_request(&malformed, &HeaderMap::new(), &request)
        .await;
    assert_eq!(response.data, None);
    assert_eq!(
        response.errors[0].extensions.get("code"),
        Some(&json!("SUBREQUEST_MALFORMED_RESPONSE"))
    );

    let failing = Url::parse(&format!("{}/failing", server.uri())).unwrap();
    let response = forwarder
        .graphql_request(&failing, &HeaderMap::new(), &request)
        .await;
    assert_eq!(
        response.errors[0].extensions.get("code"),
        Some(&json!("SUBREQUEST_HTTP_ERROR"))
    );
    assert!(response.errors[0].message.contains("500"));
}

#[tokio::test]
async fn graphql_request_passes_error_responses_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{ "message": "Syntax Error: Unexpected <EOF>.", "extensions": { "code": "GRAPHQL_PARSE_FAILED" } }]
        })))
        .mount(&server)
        .await;

    let response = Forwarder::new()
        .graphql_request(
            &origin_url(&server),
            &HeaderMap::new(),
            &graphql::Request::new("{"),
        )
        .await;
    assert_eq!(response.errors.len(), 1);
    assert_eq!(
        response.errors[0].extensions.get("code"),
        Some(&json!("GRAPHQL_PARSE_FAILED"))
    );
}
