//! The single error type every client operation resolves to.

use http::StatusCode;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A failure inside the [`Transport`](crate::Transport) before any response arrived.
///
/// Connection refused, reset, TLS failures and the like all end up here.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl TransportError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self(err.into())
    }
}

/// Everything that can go wrong when calling the BoTTube API.
///
/// Variants that never reached the server report a [status code](Self::status_code) of `0`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The client could not be set up, e.g. no usable HTTP transport or a malformed setting.
    #[error("invalid client configuration: {0}")]
    Configuration(String),

    /// The operation needs an API key and none is configured.
    #[error("API key required; call register() first")]
    AuthRequired,

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        /// The decoded response body, or `{"raw": <text>}` if it was not JSON.
        body: Value,
    },

    /// The request did not complete within the configured timeout and was aborted.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("send request to BoTTube API")]
    Transport(#[source] TransportError),

    /// The server reported success but the body did not have the expected shape.
    #[error("decode BoTTube API response (HTTP {status})")]
    Decode {
        status: u16,
        body: Value,
        #[source]
        source: serde_json::Error,
    },

    #[error("encode request body")]
    Encode(#[source] serde_json::Error),

    /// The file to upload could not be read.
    #[error("read upload file {}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Classifies a non-success response.
    ///
    /// Prefers the service's own `error` message, falling back to `HTTP <status>`.
    pub(crate) fn from_response(status: StatusCode, body: Value) -> Self {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|msg| !msg.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
        Self::Http {
            status: status.as_u16(),
            message,
            body,
        }
    }

    /// The HTTP status the server answered with, or `0` if no response was received.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Http { status, .. } | Self::Decode { status, .. } => *status,
            Self::Configuration(_)
            | Self::AuthRequired
            | Self::Timeout(_)
            | Self::Transport(_)
            | Self::Encode(_)
            | Self::File { .. } => 0,
        }
    }

    /// The response payload attached to this error, if a response was received.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True for errors where repeating the same call may succeed.
    ///
    /// The client never retries on its own.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// True if the server did not find the addressed resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// True if the call failed for lack of (valid) credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::AuthRequired | Self::Http { status: 401, .. } | Self::Http { status: 403, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_message_wins() {
        let err = Error::from_response(StatusCode::NOT_FOUND, json!({"error": "video not found"}));
        assert_eq!(err.to_string(), "video not found");
        assert_eq!(err.status_code(), 404);
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn generic_message_without_error_field() {
        let err = Error::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"raw": "Internal Server Error"}),
        );
        assert_eq!(err.to_string(), "HTTP 500");
        assert_eq!(err.body().unwrap()["raw"], "Internal Server Error");
        assert!(err.is_transient());
    }

    #[test]
    fn empty_or_non_string_error_field_is_ignored() {
        let err = Error::from_response(StatusCode::BAD_REQUEST, json!({"error": ""}));
        assert_eq!(err.to_string(), "HTTP 400");
        let err = Error::from_response(StatusCode::BAD_REQUEST, json!({"error": {"code": 7}}));
        assert_eq!(err.to_string(), "HTTP 400");
    }

    #[test]
    fn local_failures_have_status_zero() {
        assert_eq!(Error::AuthRequired.status_code(), 0);
        assert!(Error::AuthRequired.is_unauthorized());
        assert_eq!(Error::Timeout(Duration::from_millis(5)).status_code(), 0);
        assert_eq!(Error::Configuration("nope".into()).status_code(), 0);
        assert!(Error::AuthRequired.body().is_none());
    }
}
