//! Streaming the codec reply into the response body.
//!
//! # Design Decisions
//! - The first chunk is read before headers are sent; it is replayed first
//! - Each further read has its own deadline, and the whole body shares one
//! - An error ends the stream; hyper then aborts the client connection

use std::io;
use std::time::Duration;

use axum::body::Bytes;
use futures_util::stream::{self, Stream};
use tokio::time::Instant;

use crate::codec::CodecConnection;

/// Read size while relaying the rest of the reply.
const RELAY_CHUNK_BYTES: usize = 16 * 1024;

struct ReplyState {
    pending: Option<Bytes>,
    conn: Option<CodecConnection>,
    read_timeout: Duration,
    deadline: Instant,
}

/// Yield `first`, then every remaining byte of `conn` until EOF.
///
/// The connection is dropped, and so closed, as soon as the stream ends.
pub fn reply_stream(
    first: Bytes,
    conn: CodecConnection,
    read_timeout: Duration,
    write_timeout: Duration,
) -> impl Stream<Item = io::Result<Bytes>> + Send + 'static {
    let state = ReplyState {
        pending: Some(first),
        conn: Some(conn),
        read_timeout,
        deadline: Instant::now() + write_timeout,
    };

    stream::unfold(state, |mut state| async move {
        if let Some(chunk) = state.pending.take() {
            return Some((Ok(chunk), state));
        }

        let Some(mut conn) = state.conn.take() else {
            return None;
        };
        let remaining = state.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::warn!("Response write timeout reached, aborting relay");
            let err = io::Error::new(io::ErrorKind::TimedOut, "response write timeout");
            return Some((Err(err), state));
        }

        let mut buf = vec![0u8; RELAY_CHUNK_BYTES];
        match conn
            .read_chunk(&mut buf, state.read_timeout.min(remaining))
            .await
        {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                state.conn = Some(conn);
                Some((Ok(Bytes::from(buf)), state))
            }
            Err(e) => {
                tracing::error!(error = %e, "Codec reply interrupted");
                Some((Err(e), state))
            }
        }
    })
}
