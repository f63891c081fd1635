//! Integration tests for [`ServiceClient`] and [`AppResource`]: filter
//! effects observed on the wire, resource navigation, and error mapping.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use muninn::{
    AppResource, MuninnError, SecurityHeaderFilter, ServiceClient, VersionConversionFilter,
};

#[tokio::test]
async fn security_filter_sends_the_token_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/v2/master"))
        .and(header("Cookie", "muninn-app-auth=tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    client
        .ensure_filter(Arc::new(SecurityHeaderFilter::new("tok-1").unwrap()))
        .unwrap();

    let body: serde_json::Value = client
        .get_json(format!("{}/ws/v2/master", server.uri()))
        .await
        .unwrap();
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn replacing_a_filter_changes_what_goes_out() {
    let server = MockServer::start().await;
    // Only the refreshed token is accepted.
    Mock::given(method("GET"))
        .and(path("/ws/v2/master"))
        .and(header("Cookie", "muninn-app-auth=tok-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    client
        .ensure_filter(Arc::new(SecurityHeaderFilter::new("tok-old").unwrap()))
        .unwrap();
    client
        .ensure_filter(Arc::new(SecurityHeaderFilter::new("tok-new").unwrap()))
        .unwrap();
    assert_eq!(client.filter_count().unwrap(), 1);

    let response = client
        .get(format!("{}/ws/v2/master", server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn version_filter_rewrites_native_paths() {
    let server = MockServer::start().await;
    // The server only speaks v1; the native v2 path is not mounted.
    Mock::given(method("GET"))
        .and(path("/ws/v1/master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "dialect": "v1" })))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    client
        .ensure_filter(Arc::new(
            VersionConversionFilter::for_version("v1").unwrap(),
        ))
        .unwrap();

    let body: serde_json::Value = client
        .get_json(format!("{}/ws/v2/master", server.uri()))
        .await
        .unwrap();
    assert_eq!(body["dialect"], "v1");
}

#[tokio::test]
async fn native_version_filter_passes_requests_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/v2/master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "dialect": "v2" })))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    client
        .ensure_filter(Arc::new(
            VersionConversionFilter::for_version("v2").unwrap(),
        ))
        .unwrap();

    let body: serde_json::Value = client
        .get_json(format!("{}/ws/v2/master", server.uri()))
        .await
        .unwrap();
    assert_eq!(body["dialect"], "v2");
}

#[tokio::test]
async fn resources_navigate_the_service_tree() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/v2/master/physicalPlan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "operators": 3 })))
        .mount(&server)
        .await;

    let master = AppResource::new(
        ServiceClient::new(),
        format!("{}/ws/v2/master", server.uri()).parse().unwrap(),
    );

    let plan = master.path("physicalPlan").unwrap();
    let body: serde_json::Value = plan.get_json().await.unwrap();
    assert_eq!(body["operators"], 3);
}

#[tokio::test]
async fn get_json_rejects_non_success_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    let err = client
        .get_json::<serde_json::Value>(format!("{}/ws", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, MuninnError::Http(_)));
}

#[tokio::test]
async fn get_json_rejects_malformed_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>banner</html>"))
        .mount(&server)
        .await;

    let client = ServiceClient::new();
    let err = client
        .get_json::<serde_json::Value>(format!("{}/ws", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, MuninnError::Protocol(_)));
}

#[tokio::test]
async fn get_hands_back_non_success_responses_raw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    // Probing needs the headers of non-2xx responses, so `get` does
    // not turn them into errors.
    let client = ServiceClient::new();
    let response = client.get(format!("{}/ws", server.uri())).await.unwrap();
    assert_eq!(response.status(), 404);
}
