//! feesync-http: typed client for the school fee gateway REST API.
//!
//! The gateway stores one fee record per student per month and is the
//! single authority over `total_fee`, `balance_due` and `status`. This
//! crate covers the wire contract only; the synchronization engine that
//! keeps a local store consistent with it lives in `feesync-core`.

pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{ClientConfig, GatewayClient};
pub use error::{GatewayError, Result};
pub use traits::{FeeGateway, StaticToken, TokenProvider};
pub use types::{
    BatchCreate, FeeChange, FeeQuery, FeeRecord, FeeStatus, SingleCreate, StudentSummary,
};
