//! End-to-end tests for the HTTP API.
//!
//! Requests are driven through the full router (CORS, tracing and metrics
//! layers included) with `tower::ServiceExt::oneshot`.

use std::io;
use std::net::{IpAddr, SocketAddr, UdpSocket};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

use hello_backend::api::{create_router, AppState, CorsPolicy};
use hello_backend::network::{SocketFactory, DEFAULT_PROBE_TARGET};

fn app() -> Router {
    create_router(AppState::new(DEFAULT_PROBE_TARGET), &CorsPolicy::permissive())
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(uri)
                .header(header::ORIGIN, "http://10.0.1.10:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

fn assert_greeting(body: &Value) {
    assert_eq!(body["message"], "Hello from Backend!");
    assert_eq!(body["status"], "success");

    let ip = body["ip"].as_str().expect("ip is a string");
    assert!(ip.parse::<IpAddr>().is_ok(), "not an IP address: {ip}");
}

#[tokio::test]
async fn health_returns_ok_status() {
    let (status, headers, body) = get(app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
}

#[tokio::test]
async fn hello_returns_greeting_with_ip() {
    let (status, _, body) = get(app(), "/api/hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_greeting(&body);
    assert_eq!(body.as_object().unwrap().len(), 3);
}

#[tokio::test]
async fn every_route_allows_any_origin() {
    for uri in ["/", "/api/hello", "/does-not-exist"] {
        let (_, headers, _) = get(app(), uri).await;
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*", "{uri}");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true",
            "{uri}"
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_hello_requests_are_independent() {
    let app = app();

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move { get(app, "/api/hello").await })
        })
        .collect();

    for handle in handles {
        let (status, _, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_greeting(&body);
    }
}

/// Factory for a host with no usable route.
struct NoRoute;

impl SocketFactory for NoRoute {
    type Socket = UdpSocket;

    fn open(&self, _bind: SocketAddr) -> io::Result<UdpSocket> {
        Err(io::Error::new(
            io::ErrorKind::NetworkUnreachable,
            "network unreachable",
        ))
    }
}

#[tokio::test]
async fn hello_reports_loopback_without_route() {
    let app = create_router(
        AppState::with_factory(DEFAULT_PROBE_TARGET, NoRoute),
        &CorsPolicy::permissive(),
    );

    let (status, _, body) = get(app, "/api/hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "message": "Hello from Backend!",
            "ip": "127.0.0.1",
            "status": "success",
        })
    );
}
