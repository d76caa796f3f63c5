//! Error types for gateway operations.

use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to the fee gateway.
///
/// Conflicts on the create endpoints are not errors: they come back as
/// tagged variants of [`crate::types::SingleCreate`] and
/// [`crate::types::BatchCreate`] so callers branch on data, not on
/// status codes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Gateway returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Http(err.to_string())
    }
}

impl GatewayError {
    /// Check if a user-initiated retry of the same request could succeed.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Http(_) => true,
            GatewayError::Status { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Check if this is an access denied error.
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, GatewayError::Status { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_is_retryable() {
        assert!(GatewayError::Http("connection reset".into()).is_retryable());
    }

    #[test]
    fn test_server_503_is_retryable() {
        let err = GatewayError::Status {
            status: 503,
            message: "unavailable".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn test_decode_not_retryable() {
        assert!(!GatewayError::Decode("bad body".into()).is_retryable());
    }

    #[test]
    fn test_access_denied_401() {
        let err = GatewayError::Status {
            status: 401,
            message: "unauthorized".into(),
        };
        assert!(err.is_access_denied());
        assert!(!err.is_retryable());
    }
}
