//! Integration tests for single-flight request handling.

mod support;

use std::sync::Arc;
use std::time::Duration;

use relay_core::{Method, RequestSession, RequestTemplate};
use support::socket_guard::start_mock_server_or_skip;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_second_request_supersedes_first() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("fast"))
        .mount(&mock_server)
        .await;

    let session = Arc::new(RequestSession::new());
    let slow = RequestTemplate::new(Method::Get, format!("{}/slow", mock_server.uri()));
    let fast = RequestTemplate::new(Method::Get, format!("{}/fast", mock_server.uri()));

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.perform_request(&slow, None).await })
    };
    // Let the first request reach the server before superseding it.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let second = session
        .perform_request(&fast, None)
        .await
        .expect("newest request publishes")
        .expect("request should succeed");
    let first = first.await.expect("first task should not panic");

    assert_eq!(second.body, "fast");
    assert!(first.is_none(), "superseded request published {first:?}");
}

#[tokio::test]
async fn test_cancelled_request_publishes_nothing() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let session = Arc::new(RequestSession::new());
    let template = RequestTemplate::new(Method::Get, mock_server.uri());

    let pending = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.perform_request(&template, None).await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.cancel_current_request();
    session.cancel_current_request();

    let outcome = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("cancellation should end the request promptly")
        .expect("task should not panic");
    assert!(outcome.is_none());
}

#[tokio::test]
async fn test_request_after_cancel_still_runs() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("again"))
        .mount(&mock_server)
        .await;

    let session = RequestSession::new();
    session.cancel_current_request();
    let template = RequestTemplate::new(Method::Get, mock_server.uri());

    let response = session
        .perform_request(&template, None)
        .await
        .expect("not cancelled")
        .expect("request should succeed");
    assert_eq!(response.body, "again");
}
