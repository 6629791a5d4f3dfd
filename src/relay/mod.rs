//! File-to-codec relay subsystem.
//!
//! # Data Flow
//! ```text
//! request path
//!     → path.rs (decode, contain under root, open)
//!     → codec connection (send file, half-close)
//!     → body.rs (first chunk + rest of reply as a stream)
//!     → content_type.rs (header from the extension)
//!     → error.rs (any failure → fixed status + plain-text body)
//! ```
//!
//! # Design Decisions
//! - No shared mutable state; `RelayContext` is read-only
//! - Each request owns exactly one codec connection

pub mod body;
pub mod content_type;
pub mod context;
pub mod error;
pub mod handler;
pub mod path;

pub use context::RelayContext;
pub use error::RelayError;
pub use handler::relay_handler;
