//! Error types for the synchronization engine.

use crate::ops::OpKind;
use feesync_http::GatewayError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors surfaced by the session and mutation coordinator.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SyncError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// A same-kind operation is already in flight. Mutations are
    /// user-serialized; a second submission is rejected, not queued.
    #[error("A {0} operation is already in progress")]
    Busy(OpKind),

    /// Client-side validation rejected the input before any network
    /// call was made.
    #[error("{0}")]
    Validation(String),

    #[error("No fee record with id {0} in the current scope")]
    UnknownId(String),

    #[error("Session has shut down")]
    ShutDown,
}

impl SyncError {
    /// Check if a user-initiated retry of the same action could succeed.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Gateway(err) => err.is_retryable(),
            SyncError::Busy(_) => true,
            _ => false,
        }
    }
}
