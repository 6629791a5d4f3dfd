//! Request error taxonomy.
//!
//! Every variant ends the request that produced it. Nothing is retried and
//! nothing leaks into other requests.

use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body sent when the codec cannot be reached.
pub const CODEC_UNREACHABLE_BODY: &str = "Couldn't connect to Lepton.";

/// Body sent when the codec link fails after connecting.
pub const CODEC_FAILURE_BODY: &str = "Lepton returned nothing or a TCP error occurred.";

/// Errors that end a relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The requested file could not be opened.
    #[error("open {path}: {source}")]
    NotFound { path: String, source: io::Error },

    /// The request path resolves outside the root directory.
    #[error("open {path}: path escapes the root directory")]
    PathEscapesRoot { path: String },

    /// Dialing the codec failed or timed out.
    #[error("couldn't connect to {endpoint}: {source}")]
    CodecUnreachable { endpoint: String, source: io::Error },

    /// Writing the file into the codec connection failed.
    #[error("sending file to codec failed: {0}")]
    CodecSend(#[source] io::Error),

    /// Reading the first chunk of the reply failed.
    #[error("reading codec reply failed: {0}")]
    CodecRead(#[source] io::Error),

    /// The codec closed the connection without replying.
    #[error("codec closed the connection without replying")]
    CodecEmptyReply,
}

impl RelayError {
    /// HTTP status sent to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } | Self::PathEscapesRoot { .. } => StatusCode::NOT_FOUND,
            Self::CodecUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::CodecSend(_) | Self::CodecRead(_) | Self::CodecEmptyReply => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body sent to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::NotFound { .. } | Self::PathEscapesRoot { .. } => self.to_string(),
            Self::CodecUnreachable { .. } => CODEC_UNREACHABLE_BODY.to_string(),
            Self::CodecSend(_) | Self::CodecRead(_) | Self::CodecEmptyReply => {
                CODEC_FAILURE_BODY.to_string()
            }
        }
    }

    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound { .. } | Self::PathEscapesRoot { .. } => "not_found",
            Self::CodecUnreachable { .. } => "codec_unreachable",
            Self::CodecSend(_) | Self::CodecRead(_) | Self::CodecEmptyReply => "codec_failure",
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_status_and_body() {
        let not_found = RelayError::NotFound {
            path: "/a.jpg".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            not_found.public_message(),
            "open /a.jpg: No such file or directory"
        );

        let unreachable = RelayError::CodecUnreachable {
            endpoint: "tcp://localhost:2402".into(),
            source: io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        };
        assert_eq!(unreachable.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(unreachable.public_message(), "Couldn't connect to Lepton.");

        let empty = RelayError::CodecEmptyReply;
        assert_eq!(empty.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(empty.public_message(), CODEC_FAILURE_BODY);

        let timed_out = RelayError::CodecRead(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(timed_out.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(timed_out.outcome(), "codec_failure");
    }

    #[test]
    fn into_response_keeps_status() {
        let response = RelayError::PathEscapesRoot {
            path: "/../etc".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
