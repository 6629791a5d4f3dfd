//! Lepton relay
//!
//! An HTTP gateway that pushes requested files through a Lepton codec.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 LEPTON RELAY                 │
//!   GET /photo.jpg   │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │
//!  ──────────────────┼─▶│  http   │──▶│  relay   │──▶│   file    │  │
//!                    │  │ server  │   │ handler  │   │ under root│  │
//!                    │  └─────────┘   └────┬─────┘   └───────────┘  │
//!                    │                     │ bytes, half-close      │     tcp:// or
//!                    │                     ▼                        │     unix://
//!   200 image/lepton │               ┌───────────┐                  │   ┌────────┐
//!  ◀─────────────────┼───────────────│   codec   │◀─────────────────┼──▶│ Lepton │
//!                    │    streamed   │connection │     reply        │   └────────┘
//!                    │               └───────────┘                  │
//!                    └──────────────────────────────────────────────┘
//! ```

use clap::Parser;

use lepton_relay::config::Cli;
use lepton_relay::lifecycle::{signals, startup, Shutdown};
use lepton_relay::observability::{logging, metrics};
use lepton_relay::RelayServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // A bad config must stop us before we listen.
    let config = startup::resolve_config(&cli)?;

    logging::init_logging(&config.observability);
    tracing::info!("lepton-relay v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        root = %config.files.root.display(),
        codec = %config.codec.endpoint,
        read_timeout_secs = config.timeouts.read_secs,
        write_timeout_secs = config.timeouts.write_secs,
        "Configuration loaded"
    );

    let server = RelayServer::new(&config)?;

    if config.observability.metrics_enabled {
        let addr: std::net::SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = startup::bind_listener(&config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
