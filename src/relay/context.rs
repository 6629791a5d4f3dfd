//! Immutable per-process settings the handler reads on every request.

use std::path::PathBuf;
use std::time::Duration;

use crate::codec::CodecEndpoint;
use crate::config::{ConfigError, RelayConfig, ValidationError};

/// Everything a request needs from configuration, resolved once at startup.
///
/// Shared through `Arc` by all concurrent requests; never mutated.
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Canonical root directory.
    pub root: PathBuf,
    /// Where the codec listens.
    pub endpoint: CodecEndpoint,
    /// Codec dial deadline.
    pub connect_timeout: Duration,
    /// Deadline for the file upload and for each read of the reply.
    pub io_timeout: Duration,
    /// Deadline for streaming the whole response body.
    pub write_timeout: Duration,
}

impl RelayContext {
    /// Resolve a validated configuration.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let endpoint = CodecEndpoint::parse(&config.codec.endpoint)
            .map_err(|e| ConfigError::Validation(vec![ValidationError::Endpoint(e)]))?;
        let root = config.files.root.canonicalize()?;

        Ok(Self {
            root,
            endpoint,
            connect_timeout: Duration::from_secs(config.codec.connect_timeout_secs),
            io_timeout: Duration::from_secs(config.codec.io_timeout_secs),
            write_timeout: Duration::from_secs(config.timeouts.write_secs),
        })
    }
}
