//! Dispatcher behavior through the public API, without a network socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use route_dispatch::routing::{HandlerError, HandlerResult, SharedHandler};
use route_dispatch::{Dispatch, HttpServer, Method, ParsedRequest, ResponseSink, Router, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

fn noop<'a>(_: &'a ParsedRequest, _: &'a mut ResponseSink) -> BoxFuture<'a, HandlerResult> {
    async { Ok(Value::Null) }.boxed()
}

#[test]
fn registered_handlers_are_found_by_identity() {
    let mut router = Router::new();
    let mut registered: Vec<(Method, &str, SharedHandler)> = Vec::new();
    for (method, path) in [
        (Method::Get, "/"),
        (Method::Put, "/a"),
        (Method::Patch, "/b/"),
        (Method::Post, ""),
        (Method::Delete, "no-slash"),
    ] {
        let handler: SharedHandler = Arc::new(noop);
        registered.push((method, path, router.register(method, path, handler)));
    }

    for (method, path, handler) in &registered {
        assert!(Arc::ptr_eq(router.lookup(*method, path).unwrap(), handler));
    }
}

#[tokio::test]
async fn unregistered_pairs_are_not_found() {
    let mut router = Router::new();
    router.get("/known", |_, _| async { Ok(Value::Null) }.boxed());

    for (method, uri, path) in [
        ("GET", "/unknown", "/unknown"),
        ("POST", "/known", "/known"),
        ("GET", "/known/", "/known/"),
        ("DELETE", "http://localhost/x?y=z", "/x"),
    ] {
        let mut sink = ResponseSink::new();
        let outcome = router.route(request(method, uri), &mut sink).await.unwrap();
        assert_eq!(outcome, Dispatch::NotFound, "{method} {uri}");
        assert_eq!(sink.status(), StatusCode::NOT_FOUND);
        assert_eq!(sink.body_text(), format!("Resource Not Found ({})", path));
    }
}

#[tokio::test]
async fn handler_result_is_returned_to_caller() {
    let mut router = Router::new();
    router.get("/test", |req, _| {
        let john = req.query_param("john").map(str::to_string);
        async move { Ok(json!({ "route": "get/test", "john": john })) }.boxed()
    });

    let mut sink = ResponseSink::new();
    let outcome = router
        .route(request("GET", "http://localhost/test?john=bald"), &mut sink)
        .await
        .unwrap();
    assert_eq!(outcome, Dispatch::Handled(json!({"route": "get/test", "john": "bald"})));
}

#[tokio::test]
async fn handler_errors_pass_through_router() {
    let mut router = Router::new();
    router.patch("/broken", |_, _| async { Err(HandlerError::other("disk full")) }.boxed());

    let mut sink = ResponseSink::new();
    let err = router.route(request("PATCH", "/broken"), &mut sink).await.unwrap_err();
    assert!(matches!(err, HandlerError::Other(ref m) if m == "disk full"));
}

#[tokio::test]
async fn application_routes_in_process() {
    let (router, _store) = common::app_router();
    let app = HttpServer::new(ServerConfig::default(), router).app();

    let response = app.clone().oneshot(request("GET", "/?name=Madhu")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello Madhu");

    let response = app.oneshot(request("GET", "/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Resource Not Found (/unknown)");
}

#[tokio::test]
async fn concurrent_dispatch_shares_one_router() {
    let mut router = Router::new();
    router.get("/n", |req, _| {
        let n: u64 = req.query_param("n").and_then(|v| v.parse().ok()).unwrap_or(0);
        async move { Ok(json!(n * 2)) }.boxed()
    });
    let router = Arc::new(router);

    let tasks: Vec<_> = (0..32u64)
        .map(|n| {
            let router = router.clone();
            tokio::spawn(async move {
                let mut sink = ResponseSink::new();
                router.route(request("GET", &format!("/n?n={}", n)), &mut sink).await.unwrap()
            })
        })
        .collect();

    for (n, task) in tasks.into_iter().enumerate() {
        assert_eq!(task.await.unwrap(), Dispatch::Handled(json!(n as u64 * 2)));
    }
}
