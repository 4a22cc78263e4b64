//! Hello backend.
//!
//! A small HTTP service with two endpoints:
//!
//! ```text
//! GET /           -> {"status":"ok"}
//! GET /api/hello  -> {"message":"Hello from Backend!","ip":"10.0.2.20","status":"success"}
//! ```
//!
//! The `ip` field is the address the OS would use for outbound traffic, found
//! by connecting a UDP socket toward a public resolver without sending
//! anything. If that fails the service reports `127.0.0.1`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`network`]: Local IP discovery
//! - [`api`]: HTTP handlers, router and CORS policy
//! - [`commands`]: One-shot CLI commands
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod metrics;
pub mod network;
pub mod utils;

pub use config::Config;
pub use error::{AppError, Result};
