//! Startup orchestration.
//!
//! # Responsibilities
//! - Merge defaults, config file and command line flags
//! - Validate before anything is bound
//! - Bind the listener last
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::{read_config, validate_config, Cli, ConfigError, RelayConfig};

/// Build the effective configuration from the command line.
pub fn resolve_config(cli: &Cli) -> Result<RelayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };
    cli.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Bind the client-facing listener.
pub async fn bind_listener(config: &RelayConfig) -> Result<TcpListener, std::io::Error> {
    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %listener.local_addr()?, "Listener bound");
    Ok(listener)
}
