//! Error types for the humeur application.

use thiserror::Error;

/// A shared error type for the entire humeur application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Variants are grouped by the
/// error taxonomy the client exposes to the user: transport failures,
/// backend-reported failures, authentication rejection and malformed
/// responses are all distinct so callers can react to each.
#[derive(Error, Debug, Clone)]
pub enum HumeurError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/transport error: the request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status. `message` carries the
    /// body's `detail` field when present, otherwise a generic fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The protected endpoint rejected the session token (401 or 422).
    /// Fatal to the session: the caller must tear it down.
    #[error("authentication failed, please log in again")]
    AuthRejected,

    /// The stored token disappeared between screen mount and request time.
    #[error("session expired, please log in again")]
    SessionExpired,

    /// The response body did not have the expected shape. The detail is kept
    /// for diagnostics but the user-facing message stays generic.
    #[error("an error occurred")]
    UnexpectedResponse(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HumeurError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates an Api error with an explicit status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error tears down the session when it comes back from a
    /// protected endpoint.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::AuthRejected)
    }

    /// Check if this is a session-expired error
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for HumeurError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for HumeurError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for HumeurError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for HumeurError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, HumeurError>`.
pub type Result<T> = std::result::Result<T, HumeurError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_rejection_message_is_fixed() {
        let err = HumeurError::AuthRejected;
        assert_eq!(err.to_string(), "authentication failed, please log in again");
        assert!(err.is_auth_rejection());
    }

    #[test]
    fn test_api_error_surfaces_detail() {
        let err = HumeurError::api(500, "model unavailable");
        assert_eq!(err.to_string(), "model unavailable");
        assert!(!err.is_auth_rejection());
    }

    #[test]
    fn test_unexpected_response_keeps_generic_message() {
        let err = HumeurError::UnexpectedResponse("missing field `score`".to_string());
        assert_eq!(err.to_string(), "an error occurred");
    }
}
