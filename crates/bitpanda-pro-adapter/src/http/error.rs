/*
[INPUT]:  Error sources (HTTP transport, API responses, serde, validation)
[OUTPUT]: Structured error types with context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the Bitpanda Pro adapter. Nothing is retried or
/// swallowed internally; backoff policy belongs to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// Network/HTTP-layer failure surfaced from the transport
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; the raw body is kept so callers can inspect the
    /// exchange's error payload
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Missing required field or unrecognized enum value in a response
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A request value object was built in an inconsistent state
    #[error("Validation error: {0}")]
    Validation(String),

    /// URL building failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Create an API error from a status code and raw body
    pub fn api_error(status: StatusCode, body: impl Into<String>) -> Self {
        Error::Api {
            status: status.as_u16(),
            body: body.into(),
        }
    }

    /// HTTP status of a rejected request, if this is an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check whether the error originated below the API layer
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_))
    }
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, Error>;
