//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the codec endpoint and the file root before listening
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure apart from the root directory check:
//!   RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::codec::{CodecEndpoint, EndpointError};
use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address {address:?} is not a socket address: {reason}")]
    BindAddress { address: String, reason: String },

    #[error("codec.endpoint: {0}")]
    Endpoint(#[from] EndpointError),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("files.root {0:?} is not a directory")]
    Root(PathBuf),

    #[error("observability.metrics_address {address:?} is not a socket address: {reason}")]
    MetricsAddress { address: String, reason: String },
}

/// Check every field that serde cannot check on its own.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.listener.bind_address.parse::<SocketAddr>() {
        errors.push(ValidationError::BindAddress {
            address: config.listener.bind_address.clone(),
            reason: e.to_string(),
        });
    }

    if let Err(e) = CodecEndpoint::parse(&config.codec.endpoint) {
        errors.push(e.into());
    }

    let timeouts = [
        ("codec.connect_timeout_secs", config.codec.connect_timeout_secs),
        ("codec.io_timeout_secs", config.codec.io_timeout_secs),
        ("timeouts.read_secs", config.timeouts.read_secs),
        ("timeouts.write_secs", config.timeouts.write_secs),
    ];
    for (name, secs) in timeouts {
        if secs == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    if !config.files.root.is_dir() {
        errors.push(ValidationError::Root(config.files.root.clone()));
    }

    if config.observability.metrics_enabled {
        if let Err(e) = config.observability.metrics_address.parse::<SocketAddr>() {
            errors.push(ValidationError::MetricsAddress {
                address: config.observability.metrics_address.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
