//! Seams between the sync engine and the outside world.

use crate::error::Result;
use crate::types::{BatchCreate, FeeChange, FeeQuery, FeeRecord, SingleCreate, StudentSummary};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Source of the bearer token attached to every gateway request.
///
/// Injected into [`crate::GatewayClient`] at construction; the client
/// never reads ambient session state. Returning `None` sends the
/// request unauthenticated (the gateway will answer 401).
pub trait TokenProvider: Send + Sync + 'static {
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, for CLIs and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Abstraction over the remote fee gateway.
///
/// [`crate::GatewayClient`] is the production implementation; tests
/// drive the engine against in-memory fakes with scripted latency and
/// failures.
#[async_trait]
pub trait FeeGateway: Send + Sync + 'static {
    /// `GET /fees` for a filter scope. The server returns records
    /// pre-sorted by class; callers must not rely on that order.
    async fn list_fees(&self, query: &FeeQuery) -> Result<Vec<FeeRecord>>;

    /// `POST /fees/create`: one record per active student of a school
    /// for a month.
    async fn create_monthly_batch(
        &self,
        school_id: &str,
        month: &str,
        force_overwrite: bool,
    ) -> Result<BatchCreate>;

    /// `POST /fees/create-single`. The gateway derives `total_fee`
    /// server-side; the client never supplies it.
    async fn create_single(
        &self,
        student_id: &str,
        month: &str,
        paid_amount: Decimal,
    ) -> Result<SingleCreate>;

    /// `POST /fees/update`. The response echoes the updated records.
    async fn update_fees(&self, changes: &[FeeChange]) -> Result<Vec<FeeRecord>>;

    /// `POST /fees/delete`.
    async fn delete_fees(&self, ids: &[String]) -> Result<()>;

    /// `GET /students` for a school.
    async fn list_students(&self, school_id: &str) -> Result<Vec<StudentSummary>>;
}
