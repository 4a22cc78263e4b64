//! Unified error types for the backend.

use std::net::SocketAddr;

use thiserror::Error;

/// Unified error type for startup and configuration failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Prometheus exporter could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),
}

/// Local IP discovery errors.
///
/// These never reach an HTTP caller; see [`crate::network::resolve_local_ip`].
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The datagram socket could not be opened.
    #[error("failed to open probe socket on {bind}: {source}")]
    Bind {
        /// Local address the socket was bound to.
        bind: SocketAddr,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The OS has no route toward the probe target.
    #[error("no route to probe target {target}: {source}")]
    Connect {
        /// Probe target.
        target: SocketAddr,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The locally-bound address could not be read back.
    #[error("failed to read probe socket address: {0}")]
    LocalAddr(std::io::Error),

    /// The OS reported an unspecified local address.
    #[error("probe socket bound to unspecified address {0}")]
    Unroutable(std::net::IpAddr),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
