//! HTTP API route definitions.

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::Response,
    middleware::{self, Next},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::cors::CorsPolicy;
use super::handlers::{health, hello, AppState};
use crate::metrics;

/// Create the API router.
pub fn create_router(state: AppState, cors: &CorsPolicy) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let router = Router::new()
        .route("/", get(health))
        .route("/api/hello", get(hello))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(trace_layer)
        .layer(cors.cors_layer());

    let router = match cors.credentials_layer() {
        Some(credentials) => router.layer(credentials),
        None => router,
    };

    router.with_state(state)
}

/// Record latency and count for every routed request.
async fn track_metrics(req: Request, next: Next) -> Response<Body> {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let response = next.run(req).await;
    metrics::record_http_request(start, method.as_str(), &path, response.status().as_u16());
    response
}
