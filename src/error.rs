//! Error types for query-task-connector
//!
//! Every remote failure is classified into exactly one variant so callers can
//! tell a transport rejection, a malformed payload and a service-reported
//! failure apart:
//! - [`Error::RemoteRequest`] for non-2xx status codes
//! - [`Error::ResponseFormat`] for bodies that do not match the expected shape
//! - [`Error::RemoteLogicalFailure`] for 2xx responses whose status field is not `"OK"`
//!
//! Raw response bodies are captured at the point of failure so they survive
//! the trip back to the caller.

use thiserror::Error;

/// Result type alias for query-task-connector operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for query-task-connector
#[derive(Debug, Error)]
pub enum Error {
    /// The remote service answered with a non-success HTTP status code
    #[error("request to {endpoint} failed with HTTP status {status}")]
    RemoteRequest {
        /// Endpoint URL the request was sent to
        endpoint: String,
        /// HTTP status code returned by the service
        status: u16,
        /// Raw response body (may be empty)
        body: String,
    },

    /// The response body could not be interpreted as the expected payload
    #[error("invalid response format from {endpoint}: {reason}")]
    ResponseFormat {
        /// Endpoint URL the response came from
        endpoint: String,
        /// Human-readable description of what was wrong with the body
        reason: String,
        /// Raw response body, kept for diagnostics
        body: String,
        /// Underlying JSON parse failure, if the body was not valid for the schema
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The service accepted the HTTP request but reported the operation as unsuccessful
    #[error("unsuccessful response from {endpoint}: status {}", .status.as_deref().unwrap_or("<missing>"))]
    RemoteLogicalFailure {
        /// Endpoint URL the response came from
        endpoint: String,
        /// Status field reported by the service, if any
        status: Option<String>,
        /// Raw response body, kept for diagnostics
        body: String,
    },

    /// Connectivity or transport fault raised by the HTTP client
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "api.base_url")
        key: Option<String>,
    },

    /// A configured URL could not be parsed or resolved
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The query executor could not produce a result for a task
    #[error("query execution failed for task {task_id}: {message}")]
    Execution {
        /// Identifier of the task that failed
        task_id: String,
        /// Reason reported by the executor
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code carried by a [`Error::RemoteRequest`], or by a
    /// [`Error::Network`] raised for an HTTP status
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::RemoteRequest { status, .. } => Some(*status),
            Error::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body captured when a remote call failed
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Error::RemoteRequest { body, .. }
            | Error::ResponseFormat { body, .. }
            | Error::RemoteLogicalFailure { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether the remote service was reached and rejected or garbled the call
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Error::RemoteRequest { .. }
                | Error::ResponseFormat { .. }
                | Error::RemoteLogicalFailure { .. }
        )
    }

    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::RemoteRequest { .. } => "remote_request_error",
            Error::ResponseFormat { .. } => "response_format_error",
            Error::RemoteLogicalFailure { .. } => "remote_logical_failure",
            Error::Network(_) => "network_error",
            Error::Config { .. } => "config_error",
            Error::InvalidUrl(_) => "invalid_url",
            Error::Execution { .. } => "execution_error",
            Error::Serialization(_) => "serialization_error",
            Error::Io(_) => "io_error",
        }
    }

    pub(crate) fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }

    /// Returns (Error, expected_error_code, expected_remote_failure) for every variant
    /// that can be constructed without a live transport.
    fn constructible_variants() -> Vec<(Error, &'static str, bool)> {
        vec![
            (
                Error::RemoteRequest {
                    endpoint: "http://api/task/result".into(),
                    status: 500,
                    body: "boom".into(),
                },
                "remote_request_error",
                true,
            ),
            (
                Error::ResponseFormat {
                    endpoint: "http://api/task/nextjob".into(),
                    reason: "not a query task".into(),
                    body: "{not json".into(),
                    source: Some(parse_failure()),
                },
                "response_format_error",
                true,
            ),
            (
                Error::RemoteLogicalFailure {
                    endpoint: "http://api/task/result".into(),
                    status: Some("ERROR".into()),
                    body: r#"{"status":"ERROR"}"#.into(),
                },
                "remote_logical_failure",
                true,
            ),
            (
                Error::config("must not be empty", "api.base_url"),
                "config_error",
                false,
            ),
            (
                Error::InvalidUrl(url::ParseError::EmptyHost),
                "invalid_url",
                false,
            ),
            (
                Error::Execution {
                    task_id: "abc".into(),
                    message: "engine offline".into(),
                },
                "execution_error",
                false,
            ),
            (Error::Serialization(parse_failure()), "serialization_error", false),
            (
                Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
                "io_error",
                false,
            ),
        ]
    }

    #[test]
    fn every_variant_has_expected_code_and_remote_classification() {
        for (error, code, remote) in constructible_variants() {
            assert_eq!(error.error_code(), code, "wrong code for {error:?}");
            assert_eq!(
                error.is_remote_failure(),
                remote,
                "wrong remote classification for {error:?}"
            );
        }
    }

    #[test]
    fn status_code_is_only_reported_for_remote_request_errors() {
        let err = Error::RemoteRequest {
            endpoint: "http://api/task/result".into(),
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.status_code(), Some(503));

        let logical = Error::RemoteLogicalFailure {
            endpoint: "http://api/task/result".into(),
            status: Some("ERROR".into()),
            body: String::new(),
        };
        assert_eq!(logical.status_code(), None);
    }

    #[test]
    fn response_body_is_retrievable_from_remote_failures() {
        let err = Error::ResponseFormat {
            endpoint: "http://api/task/nextjob".into(),
            reason: "not a query task".into(),
            body: "<html>oops</html>".into(),
            source: None,
        };
        assert_eq!(err.response_body(), Some("<html>oops</html>"));
        assert_eq!(Error::config("x", "y").response_body(), None);
    }

    #[test]
    fn response_format_error_exposes_parse_failure_as_source() {
        use std::error::Error as _;

        let err = Error::ResponseFormat {
            endpoint: "http://api/task/nextjob".into(),
            reason: "not a query task".into(),
            body: "{not json".into(),
            source: Some(parse_failure()),
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn logical_failure_display_names_missing_status() {
        let err = Error::RemoteLogicalFailure {
            endpoint: "http://api/task/result".into(),
            status: None,
            body: "null".into(),
        };
        assert_eq!(
            err.to_string(),
            "unsuccessful response from http://api/task/result: status <missing>"
        );
    }
}
