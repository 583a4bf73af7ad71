use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use service_bootstrap::config::ConfigLoader;
use service_bootstrap::dependency::PostgresClient;
use service_bootstrap::http::default_router;
use service_bootstrap::lifecycle::{self, signals, Shutdown};
use service_bootstrap::observability::{logging, metrics};
use service_bootstrap::Readiness;

#[derive(Parser)]
#[command(name = "service-bootstrap", version)]
#[command(about = "HTTP service that probes its database once the listener is bound")]
struct Cli {
    /// TOML configuration file (falls back to $SERVICE_CONFIG).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Env file to load instead of ./.env.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = cli.env_file {
        loader = loader.with_env_file(path);
    }
    let config = loader.load().inspect_err(|e| eprintln!("configuration error: {e}"))?;

    logging::init(&config.observability);
    tracing::info!("service-bootstrap v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        probe_timeout_secs = config.startup.probe_timeout_secs,
        probe_max_attempts = config.startup.max_attempts,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = PostgresClient::from_config(&config.database)?;
    tracing::info!(database = %client.target(), "Dependency client configured");

    let shutdown = Shutdown::new();
    let readiness = Readiness::new();

    let service = lifecycle::start(&config, default_router(), client, readiness, &shutdown)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to bind listener"))?;

    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        trigger.trigger();
    });

    service.wait().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
