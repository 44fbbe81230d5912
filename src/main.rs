//! Edge gateway binary.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────┐
//!                     │                 EDGE GATEWAY                  │
//!                     │                                               │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//!   ──────────────────┼─▶│ rate     │──▶│ deadline │──▶│ routing  │  │
//!                     │  │ limiter  │   │ guard    │   │ table    │  │
//!                     │  └────┬─────┘   └────┬─────┘   └────┬─────┘  │
//!                     │       │ 429          │ 504          │ 404    │
//!                     │       ▼              ▼              ▼        │
//!   Client Response   │  ┌───────────────────────────────────────┐   │
//!   ◀─────────────────┼──│        proxy forwarder (streaming)    │◀──┼── Backends
//!                     │  └───────────────────────────────────────┘   │
//!                     └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::{self, GatewayConfig};
use edge_gateway::lifecycle::Shutdown;
use edge_gateway::observability::{logging, metrics};
use edge_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "edge-gateway", about = "Rate-limiting, routing HTTP edge gateway")]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Malformed configuration is fatal here, before the listener binds.
    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => {
            let mut config = GatewayConfig::default();
            config::loader::apply_env_overrides(&mut config);
            config
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = config.routes.len(),
        rate_limit = config.rate_limit.limit,
        window_ms = config.rate_limit.window_ms,
        request_timeout_ms = config.timeouts.request_ms,
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

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
