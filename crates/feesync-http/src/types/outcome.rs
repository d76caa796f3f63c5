//! Tagged outcomes for the conflict-bearing create endpoints.
//!
//! The gateway enforces one fee record per (student, month) and
//! signals violations with a 409. Those responses are data, not
//! failures: callers get an enum variant carrying what the gateway
//! said, and decide the fallback themselves.

use crate::types::FeeRecord;

/// Outcome of `POST /fees/create-single`.
#[derive(Debug, Clone, PartialEq)]
pub enum SingleCreate {
    /// A new record was created; the gateway assigned `total_fee`.
    Created(FeeRecord),
    /// A record already exists for this (student, month); the gateway
    /// reported its id so the caller can update it instead.
    Duplicate { existing_id: String },
}

/// Outcome of `POST /fees/create` (one record per active student).
#[derive(Debug, Clone, PartialEq)]
pub enum BatchCreate {
    /// The month run was created (or overwritten under `force`).
    Created { message: String },
    /// Records already exist for this scope and `force_overwrite` was
    /// not set. Never resolved automatically: the caller must confirm
    /// and re-invoke with force.
    NeedsConfirmation { warning: String },
}

impl BatchCreate {
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, BatchCreate::Created { .. })
    }
}
