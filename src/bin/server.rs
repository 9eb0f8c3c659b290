use std::path::PathBuf;

use clap::Parser;
use pedersen_auth::server::{Server, ServerConfig};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Pedersen proof-of-knowledge authentication server", long_about = None)]
#[command(version)]
struct Args {
    /// Configuration file (missing file means defaults)
    #[arg(short, long, env = "ZKP_CONFIG", default_value = "config/server.toml")]
    config: PathBuf,

    /// Host to bind to, overrides the configuration
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on, overrides the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds to wait for each client message, overrides the configuration
    #[arg(long)]
    read_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ServerConfig::from_file(&args.config).unwrap_or_else(|e| {
        error!("Failed to load configuration: {e}");
        info!("Using default configuration");
        ServerConfig::default()
    });

    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(secs) = args.read_timeout {
        config.session.read_timeout_secs = Some(secs);
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {e}");
        return Err(e.into());
    }

    info!(
        read_timeout = ?config.session.read_timeout(),
        max_frame_size = config.session.max_frame_size,
        "starting server"
    );

    let server = Server::new(config);
    let listener = server.bind().await?;
    server.serve_with_shutdown(listener, shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        () = terminate => {
            info!("Received terminate signal");
        },
    }
}
