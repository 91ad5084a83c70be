//! Session error types.

use crate::validate::ValidationError;
use crescent_auth_api::ApiError;
use crescent_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session operation error type.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Operation attempted before the device identity finished loading.
    /// Recoverable by retrying after initialization completes.
    #[error("Device identity is not available yet")]
    DeviceIdentityUnavailable,

    /// Local input validation failed; nothing was sent to the network
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The API rejected the operation; the message is surfaced verbatim
    #[error("{message}")]
    Api { message: String },

    /// Transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The bounded request timeout elapsed
    #[error("Request timed out")]
    Timeout,

    /// The API returned 2xx but a shape the client cannot use
    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    /// Another authentication operation is already in flight
    #[error("Another operation is already in progress")]
    Busy,

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for SessionError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Api { message, .. } => SessionError::Api { message },
            ApiError::Network(message) => SessionError::Network(message),
            ApiError::Timeout => SessionError::Timeout,
            ApiError::Malformed(message) => SessionError::MalformedResponse(message),
        }
    }
}

/// Result type alias using SessionError.
pub type SessionResult<T> = Result<T, SessionError>;

/// Machine-readable error kind, mirroring [`SessionError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    DeviceIdentityUnavailable,
    Validation,
    Api,
    Network,
    Timeout,
    MalformedResponse,
    Busy,
    Storage,
}

/// Error surfaced to the presentation layer after a failed operation.
///
/// Set as `last_error` when an operation returns false; cleared at the start
/// of the next attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&SessionError> for ErrorInfo {
    fn from(error: &SessionError) -> Self {
        let kind = match error {
            SessionError::DeviceIdentityUnavailable => ErrorKind::DeviceIdentityUnavailable,
            SessionError::Validation(_) => ErrorKind::Validation,
            SessionError::Api { .. } => ErrorKind::Api,
            SessionError::Network(_) => ErrorKind::Network,
            SessionError::Timeout => ErrorKind::Timeout,
            SessionError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            SessionError::Busy => ErrorKind::Busy,
            SessionError::Storage(_) => ErrorKind::Storage,
        };

        Self {
            kind,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_is_verbatim() {
        let error = SessionError::from(ApiError::Api {
            status: 401,
            message: "invalid credentials".to_string(),
        });

        let info = ErrorInfo::from(&error);
        assert_eq!(info.kind, ErrorKind::Api);
        assert_eq!(info.message, "invalid credentials");
    }

    #[test]
    fn test_timeout_is_distinct_from_network() {
        let timeout = ErrorInfo::from(&SessionError::from(ApiError::Timeout));
        let network = ErrorInfo::from(&SessionError::from(ApiError::Network(
            "connection refused".to_string(),
        )));

        assert_eq!(timeout.kind, ErrorKind::Timeout);
        assert_eq!(network.kind, ErrorKind::Network);
        assert_ne!(timeout.kind, network.kind);
    }

    #[test]
    fn test_malformed_is_not_an_api_error() {
        let error = SessionError::from(ApiError::Malformed("missing token".to_string()));
        assert_eq!(ErrorInfo::from(&error).kind, ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_validation_kind() {
        let error = SessionError::from(ValidationError::EmptyEmail);
        let info = ErrorInfo::from(&error);
        assert_eq!(info.kind, ErrorKind::Validation);
        assert!(!info.message.is_empty());
    }
}
