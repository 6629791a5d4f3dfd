//! Codec link subsystem.
//!
//! # Data Flow
//! ```text
//! config string "tcp://host:port" | "unix:///path"
//!     → endpoint.rs (parsed once at startup)
//!     → connection.rs (dial per request)
//!     → send file, half-close, read reply
//! ```
//!
//! The codec itself is an external service. This module only speaks to it:
//! no handshake, no framing, one connection per request.

pub mod connection;
pub mod endpoint;

pub use connection::CodecConnection;
pub use endpoint::{CodecEndpoint, EndpointError};
