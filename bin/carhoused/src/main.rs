//! `carhoused` — the Car House admin panel server.
//!
//! Usage:
//!   carhoused -c <context-name-or-path> [--listen <addr>]
//!
//! The context name resolves to `/etc/carhouse/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.
//!
//! The server renders the admin pages (dashboard, products, categories,
//! orders, users) as HTML and forwards every read and write to the hosted
//! backend through one typed client instance. It keeps no state of its own:
//! each page request is a fresh read, each mutation redirects back into a
//! full re-fetch.

mod config;
mod pages;
mod routes;
mod session;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use carhouse_client::Backend;
use config::ServerConfig;
use routes::AppState;

/// Car House admin panel server.
#[derive(Parser, Debug)]
#[command(name = "carhoused", about = "Car House admin panel server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: String,

    /// Listen address (overrides the config file).
    #[arg(long = "listen")]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // One backend client for the whole process, injected everywhere.
    let backend = Backend::new(&server_config.backend)
        .map_err(|e| anyhow::anyhow!("failed to build backend client: {}", e))?;
    info!("Backend client initialized for {}", server_config.backend.url);

    let listen = cli
        .listen
        .unwrap_or_else(|| server_config.server.listen.clone());

    let state = AppState {
        backend,
        config: Arc::new(server_config),
    };

    let app = routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("Car House admin panel listening on {}", listen);
    axum::serve(listener, app).await?;

    Ok(())
}
