//! route-dispatch server
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum (request id, trace, timeout, body limit)
//!                        │
//!                        ▼
//!                   routing::Router ── parse ── exact (method, path) lookup
//!                        │                              │
//!                        ▼                              ▼
//!                   api handlers                  404 Resource Not Found
//!                        │
//!                        ▼
//!                   storage (memory | filesystem)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_dispatch::config::{load_or_default, ServerConfig};
use route_dispatch::lifecycle::{signals, Shutdown};
use route_dispatch::observability::{logging, metrics};
use route_dispatch::storage::{open_store, StorageBackend};
use route_dispatch::{api, HttpServer, Router};

#[derive(Parser, Debug)]
#[command(name = "route-dispatch")]
#[command(about = "Exact-match HTTP dispatcher serving the books and notes API", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the storage backend
    #[arg(short, long, value_parser = parse_backend)]
    storage: Option<StorageBackend>,
}

fn parse_backend(s: &str) -> Result<StorageBackend, String> {
    s.parse()
}

impl Cli {
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if let Some(storage) = self.storage {
            config.storage.backend = storage;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);

    logging::init(&config.observability.log_level);
    tracing::info!("route-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        storage = %config.storage.backend,
        max_body_bytes = config.limits.max_body_bytes,
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = open_store(&config.storage).await?;
    let mut router = Router::with_body_limit(config.limits.max_body_bytes);
    api::register(&mut router, store);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, router);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
