//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to codec:
//!     → timeouts.rs (enforce connect / send / read deadlines)
//!     → On failure: the request ends, nothing is retried
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every codec call has a deadline
//! - No retries and no circuit breaking: a retry is the client's call

pub mod timeouts;
