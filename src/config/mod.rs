//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → config file (TOML, optional) via loader.rs
//!     → command line flags via cli.rs
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → RelayContext shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;

pub use cli::Cli;
pub use loader::{read_config, ConfigError};
pub use schema::{
    CodecConfig, FilesConfig, ListenerConfig, ObservabilityConfig, RelayConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
