//! Integration tests for the JSON admission gate over real HTTP.
//!
//! Requests are aimed at unrouted paths so a forwarded request surfaces
//! as the scoped 404 fallback, which proves it passed the gate.

use serde_json::Value;

mod common;

#[tokio::test]
async fn write_without_json_content_type_is_rejected() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .post(format!("{url}/api/v1/things"))
        .header("Content-Type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unsupported Media Type");
    assert_eq!(
        body["message"],
        "Requests must use Content-Type: application/json"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn write_without_any_content_type_is_rejected() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .put(format!("{url}/api/v1/things/1"))
        .body("hello")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);

    shutdown.trigger();
}

#[tokio::test]
async fn malformed_json_is_rejected_with_parser_detail() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .post(format!("{url}/api/v1/things"))
        .header("Content-Type", "application/json")
        .body(r#"{"a":}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Bad Request");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Malformed JSON: "), "got: {message}");
    assert!(message.len() > "Malformed JSON: ".len());

    shutdown.trigger();
}

#[tokio::test]
async fn valid_json_write_reaches_the_router() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .post(format!("{url}/api/v1/things"))
        .header("Content-Type", "application/json")
        .body(r#"{"a": 1}"#)
        .send()
        .await
        .unwrap();
    // Passed the gate; there is no such route, so the v1 fallback answers.
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Unknown v1 endpoint.");

    shutdown.trigger();
}

#[tokio::test]
async fn vendor_json_variant_is_accepted() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .patch(format!("{url}/api/v1/things/1"))
        .header("Content-Type", "application/vnd.api+json; charset=utf-8")
        .body(r#"{"op": "replace"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn empty_body_write_is_forwarded() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .post(format!("{url}/api/v1/things"))
        .header("Content-Type", "application/json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Unknown v1 endpoint.");

    shutdown.trigger();
}

#[tokio::test]
async fn delete_requests_are_never_gated() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .delete(format!("{url}/api/v1/things/1"))
        .header("Content-Type", "text/plain")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    shutdown.trigger();
}

#[tokio::test]
async fn excepted_webhook_paths_skip_enforcement() {
    let (url, shutdown) = common::spawn_app().await;
    let client = common::client();

    let res = client
        .post(format!("{url}/api/v1/webhooks/github"))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body("payload=zip")
        .send()
        .await
        .unwrap();
    // Not rejected with 415: the webhook pattern exempted it, and the
    // unrouted path fell through to the v1 fallback.
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Unknown v1 endpoint.");

    shutdown.trigger();
}

#[tokio::test]
async fn configured_exception_patterns_are_honored() {
    let mut config = console_api::config::ApiConfig::default();
    config.gate.except_paths = vec!["api/v1/ingest/*".to_string()];
    let (url, shutdown) = common::spawn_app_with(config).await;
    let client = common::client();

    // The configured pattern passes...
    let res = client
        .post(format!("{url}/api/v1/ingest/raw"))
        .header("Content-Type", "text/csv")
        .body("a,b,c")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    // ...and the default webhook exemption is gone.
    let res = client
        .post(format!("{url}/api/v1/webhooks/github"))
        .header("Content-Type", "text/plain")
        .body("x")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 415);

    shutdown.trigger();
}
