use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use autoreact_gateway::GatewayBuilder;
use autoreact_server::api::{self, AppState};
use autoreact_server::commands::CommandOptions;
use autoreact_server::config::AutoReactConfig;
use autoreact_server::error::ServerError;
use autoreact_server::{provider_factory, state_factory, telemetry};

/// AutoReact HTTP server.
#[derive(Parser, Debug)]
#[command(name = "autoreact-server", about = "Standalone HTTP server for AutoReact")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "autoreact.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_exists = Path::new(&cli.config).exists();
    let config: AutoReactConfig = if config_exists {
        let contents = std::fs::read_to_string(&cli.config)?;
        toml::from_str(&contents)?
    } else {
        AutoReactConfig::default()
    };

    telemetry::init(&config.telemetry);

    if !config_exists {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    let store = state_factory::create_store(&config.state).await?;
    info!(backend = %config.state.backend, "settings store initialized");

    let pair = provider_factory::create_provider(&config.provider)?;
    if let Err(e) = pair.provider.health_check().await {
        warn!(provider = pair.provider.name(), error = %e, "provider health check failed");
    }

    let gateway = GatewayBuilder::new()
        .store(store)
        .provider(pair.provider)
        .notifier(pair.notifier)
        .executor_config(config.executor.to_executor_config())
        .build()
        .map_err(ServerError::from)?;
    let gateway = Arc::new(gateway);

    let state = AppState {
        gateway: Arc::clone(&gateway),
        commands: CommandOptions {
            allow_ratelimit_tuning: config.commands.allow_ratelimit_tuning,
        },
    };
    let app = api::router(state);

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| ServerError::Config(format!("invalid bind address {host}:{port}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "autoreact-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    info!(
        timeout_secs = config.server.shutdown_timeout_seconds,
        "stopping workers..."
    );
    if tokio::time::timeout(shutdown_timeout, gateway.shutdown())
        .await
        .is_err()
    {
        warn!(
            timeout_secs = config.server.shutdown_timeout_seconds,
            "shutdown timeout exceeded, some notices may be lost"
        );
    }

    info!("autoreact-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
