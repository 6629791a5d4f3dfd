//! Codec endpoint descriptor.
//!
//! # Responsibilities
//! - Parse `tcp://host:port` and `unix:///path/to/socket` URLs
//! - Reject anything else before the relay starts listening
//!
//! # Design Decisions
//! - The scheme is resolved once; the dial path never re-inspects a string
//! - TCP authorities keep the host unresolved so DNS happens at dial time

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use thiserror::Error;
use url::Url;

/// Errors produced while parsing a codec endpoint URL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    /// The string is not a URL at all.
    #[error("invalid codec URL {url:?}: {reason}")]
    Malformed { url: String, reason: String },

    /// The scheme is neither `tcp` nor `unix`.
    #[error("unsupported codec URL scheme {0:?}, expected tcp or unix")]
    UnsupportedScheme(String),

    /// A `tcp://` URL without a host.
    #[error("codec URL {0:?} has no host")]
    MissingHost(String),

    /// A `tcp://` URL without a port.
    #[error("codec URL {0:?} has no port")]
    MissingPort(String),

    /// A `unix://` URL without a socket path.
    #[error("codec URL {0:?} has no socket path")]
    MissingPath(String),
}

/// Where the codec service listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecEndpoint {
    /// `host:port`, resolved on every dial.
    Tcp { authority: String },
    /// Filesystem path of a Unix domain socket.
    Unix { path: PathBuf },
}

impl CodecEndpoint {
    /// Parse an endpoint URL.
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let url = Url::parse(input).map_err(|e| EndpointError::Malformed {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "tcp" => {
                let host = url
                    .host_str()
                    .filter(|h| !h.is_empty())
                    .ok_or_else(|| EndpointError::MissingHost(input.to_string()))?;
                let port = url
                    .port()
                    .ok_or_else(|| EndpointError::MissingPort(input.to_string()))?;
                Ok(Self::Tcp {
                    authority: format!("{}:{}", host, port),
                })
            }
            "unix" => {
                let path = percent_decode_str(url.path()).decode_utf8_lossy();
                if path.is_empty() || path == "/" {
                    return Err(EndpointError::MissingPath(input.to_string()));
                }
                Ok(Self::Unix {
                    path: PathBuf::from(path.into_owned()),
                })
            }
            other => Err(EndpointError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Scheme name as written in the URL.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Tcp { .. } => "tcp",
            Self::Unix { .. } => "unix",
        }
    }
}

impl FromStr for CodecEndpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CodecEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://", self.scheme())?;
        match self {
            Self::Tcp { authority } => f.write_str(authority),
            Self::Unix { path } => write!(f, "{}", path.display()),
        }
    }
}
