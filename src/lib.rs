//! Lepton relay library.
//!
//! Serves files from a root directory through an external Lepton codec
//! reached over TCP or a Unix domain socket.

pub mod codec;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod resilience;

pub use config::schema::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
