//! Authentication API error types.

use thiserror::Error;

/// Error type for calls against the remote authentication API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API returned an error status with a message (surfaced verbatim)
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Transport failure (DNS, connection reset, TLS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// The bounded request timeout elapsed
    #[error("Request timed out")]
    Timeout,

    /// The API returned 2xx but a shape the client cannot parse
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    /// Returns true if this error is transient and the operation can be retried.
    ///
    /// Transient errors include network failures, timeouts, and 5xx server
    /// errors. Malformed responses and 4xx rejections are not retryable.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Timeout => true,
            ApiError::Api { status, .. } => *status >= 500,
            ApiError::Malformed(_) => false,
        }
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
