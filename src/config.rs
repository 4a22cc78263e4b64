//! Application configuration loaded from environment variables.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::AppError;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    #[strum(serialize = "pretty")]
    Pretty,
    /// One JSON object per line.
    #[strum(serialize = "json")]
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Listen address.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Optional port for the Prometheus scrape endpoint.
    #[serde(default)]
    pub metrics_port: Option<u16>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Log format: pretty or json.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    // === Network Discovery ===
    /// Remote address used to let the OS pick the outbound interface.
    #[serde(default = "default_probe_target")]
    pub ip_probe_target: String,

    // === CORS ===
    /// Send `Access-Control-Allow-Credentials: true` on every response.
    #[serde(default = "default_true")]
    pub cors_allow_credentials: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_probe_target() -> String {
    "8.8.8.8:80".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            metrics_port: None,
            rust_log: default_log_level(),
            verbose: false,
            log_format: default_log_format(),
            ip_probe_target: default_probe_target(),
            cors_allow_credentials: true,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), AppError> {
        self.listen_addr()?;
        self.probe_target()?;
        self.log_format()?;

        if self.metrics_port == Some(self.port) {
            return Err(AppError::InvalidConfig(
                "METRICS_PORT must differ from PORT".to_string(),
            ));
        }

        Ok(())
    }

    /// Socket address the HTTP server binds to.
    pub fn listen_addr(&self) -> Result<SocketAddr, AppError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("HOST is not an IP address: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Socket address the Prometheus exporter binds to, if enabled.
    pub fn metrics_addr(&self) -> Result<Option<SocketAddr>, AppError> {
        let Some(port) = self.metrics_port else {
            return Ok(None);
        };
        Ok(Some(SocketAddr::new(self.listen_addr()?.ip(), port)))
    }

    /// Parsed discovery probe target.
    pub fn probe_target(&self) -> Result<SocketAddr, AppError> {
        let target: SocketAddr = self.ip_probe_target.parse().map_err(|_| {
            AppError::InvalidConfig(format!(
                "IP_PROBE_TARGET must be ip:port, got {}",
                self.ip_probe_target
            ))
        })?;

        if target.port() == 0 {
            return Err(AppError::InvalidConfig(
                "IP_PROBE_TARGET port must be non-zero".to_string(),
            ));
        }

        Ok(target)
    }

    /// Parsed log format.
    pub fn log_format(&self) -> Result<LogFormat, AppError> {
        self.log_format.parse().map_err(|_| {
            AppError::InvalidConfig(format!(
                "LOG_FORMAT must be pretty or json, got {}",
                self.log_format
            ))
        })
    }
}
