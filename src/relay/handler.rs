//! The relay handler.
//!
//! # Flow
//! ```text
//! GET /path
//!     → resolve under root, open file          (404 on failure)
//!     → dial codec                              (502 on failure)
//!     → send file, half-close                   (500 on failure)
//!     → read first chunk, must be non-empty     (500 on failure)
//!     → 200 + content type, stream rest of reply
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::codec::CodecConnection;
use crate::http::request::request_id;
use crate::observability::metrics;
use crate::relay::body::reply_stream;
use crate::relay::content_type::content_type_for;
use crate::relay::context::RelayContext;
use crate::relay::error::RelayError;
use crate::relay::path::{decode_path, open_contained, resolve};

/// Size of the first read from the codec.
pub const FIRST_READ_BYTES: usize = 100;

/// Axum handler: relay one file through the codec.
pub async fn relay_handler(
    State(ctx): State<Arc<RelayContext>>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();
    let path = decode_path(uri.path());

    tracing::debug!(request_id = %request_id, path = %path, "Relaying file");

    match relay(&ctx, uri.path(), &path).await {
        Ok(response) => {
            metrics::record_request("relayed", StatusCode::OK.as_u16(), start_time);
            response
        }
        Err(err) => {
            match &err {
                RelayError::NotFound { .. } | RelayError::PathEscapesRoot { .. } => {
                    tracing::warn!(request_id = %request_id, path = %path, error = %err, "File not found");
                }
                RelayError::CodecUnreachable { .. } => {
                    tracing::error!(request_id = %request_id, endpoint = %ctx.endpoint, error = %err, "Couldn't connect to codec");
                }
                _ => {
                    tracing::error!(request_id = %request_id, path = %path, error = %err, "Bad codec response");
                }
            }
            metrics::record_request(err.outcome(), err.status().as_u16(), start_time);
            err.into_response()
        }
    }
}

/// The linear relay pipeline. Every step must finish before the next starts.
///
/// `raw_path` locates the file; `path` is its decoded form for messages and
/// the content type.
async fn relay(ctx: &RelayContext, raw_path: &str, path: &str) -> Result<Response, RelayError> {
    let local = resolve(&ctx.root, raw_path)?;
    let mut file = open_contained(&ctx.root, &local, path).await?;

    let mut conn = CodecConnection::connect(&ctx.endpoint, ctx.connect_timeout)
        .await
        .map_err(|source| RelayError::CodecUnreachable {
            endpoint: ctx.endpoint.to_string(),
            source,
        })?;

    let sent = conn
        .send_all(&mut file, ctx.io_timeout)
        .await
        .map_err(RelayError::CodecSend)?;
    drop(file);
    metrics::record_bytes_sent(sent);

    let mut first = vec![0u8; FIRST_READ_BYTES];
    let read = conn
        .read_chunk(&mut first, ctx.io_timeout)
        .await
        .map_err(RelayError::CodecRead)?;
    if read == 0 {
        return Err(RelayError::CodecEmptyReply);
    }
    first.truncate(read);

    tracing::debug!(path = %path, sent, first_read = read, "Codec replied");

    let body = Body::from_stream(reply_stream(
        Bytes::from(first),
        conn,
        ctx.io_timeout,
        ctx.write_timeout,
    ));
    let mut response = Response::new(body);
    if let Some(content_type) = content_type_for(path) {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    Ok(response)
}
