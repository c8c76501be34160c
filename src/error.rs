//! Error types for Promptcast
//!
//! This module defines the error enum used throughout the application,
//! using `thiserror` for ergonomic error handling, plus the tagged
//! [`RemoteResult`] returned by every call to the assistant server.

use thiserror::Error;

/// Main error type for Promptcast operations
///
/// Covers configuration loading, talking to the assistant server, session
/// resolution, and the local session cache.
#[derive(Error, Debug)]
pub enum PromptcastError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The assistant server is not listening on the target endpoint
    #[error(
        "Connection refused at {0}. Is the assistant server running? \
         Start it on that host and port, or pass --host/--port to target another one."
    )]
    ConnectionRefused(String),

    /// An explicitly requested session does not exist on the server
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// The server accepted a create request but returned no usable session
    #[error("Failed to create session: {0}")]
    SessionCreationFailed(String),

    /// Any other failure reported by the assistant server
    #[error("Server error: {0}")]
    Remote(String),

    /// Local session cache errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Promptcast operations
///
/// Uses `anyhow::Error` so callers can attach context while the concrete
/// [`PromptcastError`] stays available through `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;

/// Why a remote call failed to produce a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Nothing is listening at the endpoint
    #[error("connection refused at {0}")]
    ConnectionRefused(String),

    /// The server answered with a non-success status other than 404
    #[error("server returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Any other transport problem (timeouts from the OS, resets, ...)
    #[error("{0}")]
    Other(String),
}

/// Tagged outcome of a single call to the assistant server
///
/// The server's responses vary in shape between success and failure, so
/// each call is reduced to exactly one of these three cases.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResult<T> {
    /// The call succeeded with a payload
    Ok(T),
    /// The addressed resource does not exist
    NotFound,
    /// The call failed before a usable answer was produced
    TransportError(TransportFailure),
}

impl<T> RemoteResult<T> {
    /// Discards the failure detail
    pub fn ok(self) -> Option<T> {
        match self {
            RemoteResult::Ok(value) => Some(value),
            _ => None,
        }
    }


    /// Converts into a plain `Result`
    ///
    /// `not_found` builds the error used for [`RemoteResult::NotFound`]. A
    /// refused connection always becomes [`PromptcastError::ConnectionRefused`]
    /// so the top level can print start-the-server guidance.
    pub fn into_result<F>(self, not_found: F) -> Result<T>
    where
        F: FnOnce() -> PromptcastError,
    {
        match self {
            RemoteResult::Ok(value) => Ok(value),
            RemoteResult::NotFound => Err(not_found().into()),
            RemoteResult::TransportError(failure) => Err(failure.into_error().into()),
        }
    }
}

impl TransportFailure {
    /// Lifts the failure into the crate-wide error type
    pub fn into_error(self) -> PromptcastError {
        match self {
            TransportFailure::ConnectionRefused(addr) => PromptcastError::ConnectionRefused(addr),
            other => PromptcastError::Remote(other.to_string()),
        }
    }
}

/// Returns `true` when the error chain bottoms out in a refused connection
pub fn is_connection_refused(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<PromptcastError>(),
            Some(PromptcastError::ConnectionRefused(_))
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = PromptcastError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_session_not_found_names_the_id() {
        let error = PromptcastError::SessionNotFound("ses_abc123".to_string());
        assert_eq!(error.to_string(), "Session not found: ses_abc123");
    }

    #[test]
    fn test_connection_refused_gives_guidance() {
        let error = PromptcastError::ConnectionRefused("127.0.0.1:4096".to_string());
        let message = error.to_string();
        assert!(message.contains("127.0.0.1:4096"));
        assert!(message.contains("Is the assistant server running?"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: PromptcastError = io_error.into();
        assert!(matches!(error, PromptcastError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: PromptcastError = yaml_error.into();
        assert!(matches!(error, PromptcastError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PromptcastError>();
    }

    #[test]
    fn test_into_result_not_found_uses_callback() {
        let result: RemoteResult<u8> = RemoteResult::NotFound;
        let err = result
            .into_result(|| PromptcastError::SessionNotFound("ses_x".to_string()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Session not found: ses_x");
    }

    #[test]
    fn test_into_result_connection_refused_is_classified() {
        let result: RemoteResult<u8> = RemoteResult::TransportError(
            TransportFailure::ConnectionRefused("localhost:4096".to_string()),
        );
        let err = result
            .into_result(|| PromptcastError::SessionNotFound("unused".to_string()))
            .unwrap_err();
        assert!(is_connection_refused(&err));
    }

    #[test]
    fn test_into_result_status_is_remote_error() {
        let result: RemoteResult<u8> = RemoteResult::TransportError(TransportFailure::Status {
            status: 500,
            body: "boom".to_string(),
        });
        let err = result
            .into_result(|| PromptcastError::SessionNotFound("unused".to_string()))
            .unwrap_err();
        assert!(!is_connection_refused(&err));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_is_connection_refused_sees_through_context() {
        let err = anyhow::Error::from(PromptcastError::ConnectionRefused("h:1".to_string()))
            .context("while sending prompt");
        assert!(is_connection_refused(&err));
    }

    #[test]
    fn test_ok_discards_failures() {
        assert_eq!(RemoteResult::Ok(1u8).ok(), Some(1));
        assert_eq!(RemoteResult::<u8>::NotFound.ok(), None);
    }
}
