//! Listener error types and their HTTP rendering.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pipeline::PipelineError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ListenerError {
    /// The pipeline run failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read listener address: {source}")]
    LocalAddr {
        #[source]
        source: std::io::Error,
    },

    #[error("Server on {addr} stopped: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl ListenerError {
    /// Every listener failure is a server-side failure; malformed requests
    /// never get this far because the `Json` extractor rejects them.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Pipeline(_)
            | Self::Bind { .. }
            | Self::LocalAddr { .. }
            | Self::Serve { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ListenerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn unreadable_local_address_is_not_reported_as_a_bind_failure() {
        let err = ListenerError::LocalAddr {
            source: io::Error::new(io::ErrorKind::NotConnected, "socket closed"),
        };

        assert_eq!(err.to_string(), "Failed to read listener address: socket closed");
        assert!(!err.to_string().contains("bind"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
