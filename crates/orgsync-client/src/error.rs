//! Client error types.

use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 401.
    #[error("not authorized")]
    Unauthorized,

    /// The backend returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, if any.
        message: String,
    },

    /// The backend returned a success status other than the one the endpoint
    /// promises (e.g. 200 where 201 is required).
    #[error("expected HTTP {expected}, got {status}")]
    UnexpectedStatus { expected: u16, status: u16 },

    /// Failed to parse a response body or event payload.
    #[error("parse error: {0}")]
    Parse(String),

    /// The event stream broke or ended.
    #[error("event stream error: {0}")]
    Stream(String),

    /// Configuration rejected while building the client.
    #[error("configuration error: {0}")]
    Config(String),
}
