//! Cross-origin policy applied to every response.

use axum::http::{header, HeaderValue};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Config;

/// Process-wide CORS policy, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorsPolicy {
    /// Answer `Access-Control-Allow-Origin: *`.
    pub allow_any_origin: bool,
    /// Allow every method on preflight.
    pub allow_any_method: bool,
    /// Allow every request header on preflight.
    pub allow_any_header: bool,
    /// Send `Access-Control-Allow-Credentials: true`.
    pub allow_credentials: bool,
}

impl CorsPolicy {
    /// Everything allowed, credentials included.
    pub fn permissive() -> Self {
        Self {
            allow_any_origin: true,
            allow_any_method: true,
            allow_any_header: true,
            allow_credentials: true,
        }
    }

    /// Build the policy from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            allow_credentials: config.cors_allow_credentials,
            ..Self::permissive()
        }
    }

    /// Wildcard origin combined with credentials.
    ///
    /// Browsers refuse credentialed responses carrying `*`, so credentialed
    /// cross-origin calls will fail even though the header is sent.
    pub fn is_credentialed_wildcard(&self) -> bool {
        self.allow_any_origin && self.allow_credentials
    }

    /// CORS layer for origin, methods and headers.
    ///
    /// tower-http panics when `Any` is combined with credentials, so the
    /// credentials header is left to [`CorsPolicy::credentials_layer`].
    pub fn cors_layer(&self) -> CorsLayer {
        let mut layer = CorsLayer::new();
        if self.allow_any_origin {
            layer = layer.allow_origin(Any);
        }
        if self.allow_any_method {
            layer = layer.allow_methods(Any);
        }
        if self.allow_any_header {
            layer = layer.allow_headers(Any);
        }
        layer
    }

    /// Layer adding `Access-Control-Allow-Credentials: true`, if enabled.
    pub fn credentials_layer(&self) -> Option<SetResponseHeaderLayer<HeaderValue>> {
        self.allow_credentials.then(|| {
            SetResponseHeaderLayer::if_not_present(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            )
        })
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissive_policy_is_flagged() {
        assert!(CorsPolicy::permissive().is_credentialed_wildcard());
    }

    #[test]
    fn config_can_disable_credentials() {
        let config = Config {
            cors_allow_credentials: false,
            ..Config::default()
        };
        let policy = CorsPolicy::from_config(&config);

        assert!(policy.allow_any_origin);
        assert!(!policy.is_credentialed_wildcard());
        assert!(policy.credentials_layer().is_none());
    }
}
