//! Hello backend entry point.

use std::io;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hello_backend::api::{create_router, AppState, CorsPolicy};
use hello_backend::commands;
use hello_backend::config::{Config, LogFormat};
use hello_backend::metrics;
use hello_backend::network::UdpSocketFactory;
use hello_backend::utils::shutdown_signal;

/// Health check and greeting backend.
#[derive(Parser, Debug)]
#[command(name = "hello-backend")]
#[command(about = "HTTP backend reporting its outbound IP address")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Listen address (overrides HOST).
    #[arg(long, global = true)]
    host: Option<String>,

    /// HTTP server port (overrides PORT).
    #[arg(short, long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default).
    Run,

    /// Check configuration validity.
    CheckConfig,

    /// Run local IP discovery once and print the result.
    ShowIp,

    /// Print the OpenAPI document.
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration, CLI flags win over the environment
    let mut config = Config::load()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    config.verbose |= args.verbose;

    init_logging(&config);

    match args.command {
        Some(Command::CheckConfig) => commands::check_config(&config, &mut io::stdout()),
        Some(Command::ShowIp) => commands::show_ip(&config, &UdpSocketFactory, &mut io::stdout()),
        Some(Command::Openapi) => commands::openapi(&mut io::stdout()),
        Some(Command::Run) | None => cmd_run(config).await,
    }
}

fn init_logging(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new("hello_backend=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Validation reports a bad LOG_FORMAT; fall back to pretty until then
    let json = matches!(config.log_format(), Ok(LogFormat::Json));

    tracing_subscriber::registry()
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .with(filter)
        .init();
}

fn warn_on_cors_policy(policy: &CorsPolicy) {
    if policy.is_credentialed_wildcard() {
        warn!(
            "CORS allows any origin together with credentials; browsers reject \
             credentialed responses with a wildcard origin. Set \
             CORS_ALLOW_CREDENTIALS=false or restrict origins at the proxy"
        );
    }
}

/// Serve the HTTP API until a shutdown signal arrives.
async fn cmd_run(config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let addr = config.listen_addr()?;
    let probe_target = config.probe_target()?;
    let cors = CorsPolicy::from_config(&config);

    info!("Configuration loaded successfully");
    info!("Probe target: {}", probe_target);
    info!("CORS: {:?}", cors);
    warn_on_cors_policy(&cors);

    if let Some(metrics_addr) = config.metrics_addr()? {
        metrics::install_exporter(metrics_addr)?;
    }

    let router = create_router(AppState::new(probe_target), &cors);

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
