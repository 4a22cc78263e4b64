//! HTTP API handlers.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::network::{IpResolver, SocketFactory, UdpSocketFactory, DEFAULT_PROBE_TARGET};

/// Greeting message returned by `/api/hello`.
pub const GREETING_MESSAGE: &str = "Hello from Backend!";

/// Application state shared with handlers.
///
/// Immutable after startup; cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Remote address used for local IP discovery.
    pub probe_target: SocketAddr,
    /// Opens the discovery socket.
    pub resolver: Arc<dyn IpResolver>,
}

impl AppState {
    /// Create new app state using real UDP sockets.
    pub fn new(probe_target: SocketAddr) -> Self {
        Self::with_factory(probe_target, UdpSocketFactory)
    }

    /// Create app state with a custom socket factory.
    pub fn with_factory<F: SocketFactory + 'static>(probe_target: SocketAddr, factory: F) -> Self {
        Self {
            probe_target,
            resolver: Arc::new(factory),
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("probe_target", &self.probe_target)
            .finish_non_exhaustive()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TARGET)
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct GreetingResponse {
    /// Constant greeting.
    pub message: &'static str,
    /// Outbound-facing IP of this host, or 127.0.0.1.
    pub ip: String,
    /// Status: "success".
    pub status: &'static str,
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is alive", body = HealthResponse))
)]
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Greeting handler - reports the host's outbound IP, never fails.
#[utoipa::path(
    get,
    path = "/api/hello",
    responses((status = 200, description = "Greeting with backend IP", body = GreetingResponse))
)]
pub async fn hello(State(state): State<AppState>) -> impl IntoResponse {
    let (ip, _) = state.resolver.resolve(state.probe_target);

    Json(GreetingResponse {
        message: GREETING_MESSAGE,
        ip: ip.to_string(),
        status: "success",
    })
}
