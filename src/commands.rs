//! One-shot CLI commands: `check-config`, `show-ip` and `openapi`.
//!
//! Output goes to the given writer so the binary can pass stdout.

use std::io::Write;

use crate::api::{docs, CorsPolicy};
use crate::config::Config;
use crate::network::{IpResolver, SocketFactory};

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Validate the configuration and print a summary.
pub fn check_config<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "HELLO BACKEND - CONFIGURATION CHECK")?;
    writeln!(out, "{RULE}")?;

    write!(out, "Validating configuration... ")?;
    if let Err(e) = config.validate() {
        writeln!(out, "FAILED")?;
        writeln!(out, "  Error: {}", e)?;
        return Err(anyhow::anyhow!("Configuration validation failed"));
    }
    writeln!(out, "OK")?;

    let cors = CorsPolicy::from_config(config);

    writeln!(out, "{THIN_RULE}")?;
    writeln!(out, "Configuration Summary:")?;
    writeln!(out, "  Listen Address: {}", config.listen_addr()?)?;
    writeln!(
        out,
        "  Metrics: {}",
        match config.metrics_addr()? {
            Some(addr) => addr.to_string(),
            None => "Disabled".to_string(),
        }
    )?;
    writeln!(out, "  Probe Target: {}", config.probe_target()?)?;
    writeln!(out, "  Log Format: {}", config.log_format()?)?;
    writeln!(out, "  CORS Origins: *")?;
    writeln!(out, "  CORS Credentials: {}", cors.allow_credentials)?;
    if cors.is_credentialed_wildcard() {
        writeln!(
            out,
            "  WARNING: wildcard origin with credentials is rejected by browsers"
        )?;
    }
    writeln!(out, "{RULE}")?;
    writeln!(out, "CONFIGURATION CHECK PASSED")?;
    writeln!(out, "{RULE}")?;

    Ok(())
}

/// Run local IP discovery once and print the address and its source.
pub fn show_ip<F: SocketFactory, W: Write>(
    config: &Config,
    factory: &F,
    out: &mut W,
) -> anyhow::Result<()> {
    let target = config.probe_target()?;
    let (ip, source) = factory.resolve(target);

    writeln!(out, "{} ({}, probe target {})", ip, source, target)?;
    Ok(())
}

/// Print the OpenAPI document.
pub fn openapi<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{}", docs::openapi_json()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::net::{SocketAddr, UdpSocket};

    struct NoRoute;

    impl SocketFactory for NoRoute {
        type Socket = UdpSocket;

        fn open(&self, _bind: SocketAddr) -> io::Result<UdpSocket> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    fn run<F>(f: F) -> (anyhow::Result<()>, String)
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        let result = f(&mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn check_config_passes_and_flags_credentialed_wildcard() {
        let (result, out) = run(|out| check_config(&Config::default(), out));

        assert!(result.is_ok());
        assert!(out.contains("Listen Address: 0.0.0.0:8000"), "{out}");
        assert!(out.contains("Metrics: Disabled"), "{out}");
        assert!(out.contains("WARNING: wildcard origin"), "{out}");
        assert!(out.contains("CONFIGURATION CHECK PASSED"), "{out}");
    }

    #[test]
    fn check_config_without_credentials_has_no_warning() {
        let config = Config {
            cors_allow_credentials: false,
            metrics_port: Some(9100),
            ..Config::default()
        };
        let (result, out) = run(|out| check_config(&config, out));

        assert!(result.is_ok());
        assert!(out.contains("Metrics: 0.0.0.0:9100"), "{out}");
        assert!(!out.contains("WARNING"), "{out}");
    }

    #[test]
    fn check_config_reports_validation_failure() {
        let config = Config {
            ip_probe_target: "not-an-address".to_string(),
            ..Config::default()
        };
        let (result, out) = run(|out| check_config(&config, out));

        assert!(result.is_err());
        assert!(out.contains("FAILED"), "{out}");
        assert!(out.contains("IP_PROBE_TARGET"), "{out}");
        assert!(!out.contains("PASSED"), "{out}");
    }

    #[test]
    fn show_ip_prints_fallback_source() {
        let (result, out) = run(|out| show_ip(&Config::default(), &NoRoute, out));

        assert!(result.is_ok());
        assert_eq!(out, "127.0.0.1 (fallback, probe target 8.8.8.8:80)\n");
    }

    #[test]
    fn openapi_prints_json_document() {
        let (result, out) = run(openapi::<Vec<u8>>);

        assert!(result.is_ok());
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(doc["paths"]["/api/hello"]["get"].is_object());
        assert!(doc["paths"]["/"]["get"].is_object());
    }
}
