//! End-to-end tests: real listener, real HTTP client.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rpc_adapter::adapter::{ErrorBody, ErrorKind, HandlerOptions, QueryValue};
use rpc_adapter::handler::{EchoFactory, FAIL_PATH};
use rpc_adapter::ServiceConfig;

mod common;

use common::{client, start_server, RecordingFactory, RecordingHandler};

const MISSING_ROUTE_BODY: &str = r#"{"message":"Query \"trpc\" not found - is the `trpc-openapi` file named `[...trpc].ts`?","code":"INTERNAL_SERVER_ERROR"}"#;

#[tokio::test]
async fn test_routed_request_is_normalized_and_delegated() {
    let handler = Arc::new(RecordingHandler::default());
    let server = start_server(
        ServiceConfig::default(),
        &RecordingFactory(handler.clone()),
        HandlerOptions::new(),
    )
    .await;

    let res = client()
        .get(server.url("/api/users/list?limit=10"))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");
    assert_eq!(handler.calls(), 1);

    let requests = handler.requests.lock().unwrap();
    assert_eq!(requests[0].url, "/users/list");
    let query = requests[0].query.as_ref().unwrap();
    assert_eq!(query.len(), 1);
    assert_eq!(query["limit"], QueryValue::Single("10".into()));

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_route_returns_json_500() {
    let handler = Arc::new(RecordingHandler::default());
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let options = HandlerOptions::new().with_on_error(move |event| {
        sink.lock().unwrap().push(event.kind);
    });
    let server = start_server(ServiceConfig::default(), &RecordingFactory(handler.clone()), options).await;

    let res = client().post(server.url("/api")).send().await.unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), MISSING_ROUTE_BODY);

    assert_eq!(handler.calls(), 0);
    assert_eq!(*reports.lock().unwrap(), vec![ErrorKind::Unknown]);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_echo_handler_round_trip() {
    let mut config = ServiceConfig::default();
    config.mount.prefix = "/trpc".into();
    let server = start_server(config, &EchoFactory, HandlerOptions::new()).await;

    let res = client()
        .get(server.url("/trpc/posts//byId/?id=1&id=2&draft"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "method": "GET",
            "path": "/posts/byId",
            "query": { "id": ["1", "2"], "draft": "" }
        })
    );

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_handler_failure_propagates_to_host() {
    let reported = Arc::new(AtomicUsize::new(0));
    let counter = reported.clone();
    let options = HandlerOptions::new().with_on_error(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let server = start_server(ServiceConfig::default(), &EchoFactory, options).await;

    let res = client()
        .get(server.url(&format!("/api{FAIL_PATH}")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    // Host-level failure, not the adapter's JSON error body.
    assert_ne!(
        res.headers().get("content-type").map(|v| v.as_bytes()),
        Some(&b"application/json"[..])
    );
    assert_eq!(reported.load(Ordering::SeqCst), 1);

    server.shutdown.trigger();
}

#[tokio::test]
async fn test_custom_route_key_in_error_message() {
    let mut config = ServiceConfig::default();
    config.mount.route_key = "rpc".into();
    let server = start_server(config, &EchoFactory, HandlerOptions::new()).await;

    let res = client().get(server.url("/api")).send().await.unwrap();
    assert_eq!(res.status(), 500);
    let body: ErrorBody = res.json().await.unwrap();
    assert_eq!(
        body.message,
        "Query \"rpc\" not found - is the `trpc-openapi` file named `[...rpc].ts`?"
    );

    let res = client().get(server.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.shutdown.trigger();
}
