//! The mutation coordinator.
//!
//! Serializes create, update and delete operations against the store
//! and the gateway. Success handlers patch the store from the
//! gateway's response instead of reloading; only batch creation
//! (whose response carries no records) triggers a reload.

use crate::error::{Result, SyncError};
use crate::notice::NoticeKind;
use crate::ops::OpKind;
use crate::session::{run_reload, FeeSession};
use chrono::NaiveDate;
use feesync_http::{BatchCreate, FeeChange, GatewayError, SingleCreate};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{info, warn};

/// How a single-fee save ended. The distinction is user-visible:
/// "created" and "updated an existing record" read differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    CreatedNew,
    UpdatedExisting,
}

impl FeeSession {
    /// Create a fee record for one student and month. The gateway
    /// derives `total_fee`; the client never supplies it.
    ///
    /// If a record already exists for the (student, month) pair the
    /// gateway answers with its id, and the save transparently falls
    /// back to updating that record with the given amount. The
    /// outcome tells the caller which path was taken.
    pub async fn create_single(
        &self,
        student_id: &str,
        month: &str,
        paid_amount: Decimal,
    ) -> Result<SaveOutcome> {
        let inner = self.inner().clone();
        let _guard = inner
            .busy
            .try_begin(OpKind::Create)
            .ok_or(SyncError::Busy(OpKind::Create))?;

        match inner
            .gateway
            .create_single(student_id, month, paid_amount)
            .await
        {
            Ok(SingleCreate::Created(record)) => {
                info!(
                    "[Coordinator] created fee record {} for {}",
                    record.id, record.student_name
                );
                let ttl = inner.success_ttl();
                let mut state = inner.state.write().await;
                if inner.liveness.is_alive() {
                    state.notices.push(NoticeKind::Success, "Fee record created.", ttl);
                    state.store.upsert(record);
                }
                Ok(SaveOutcome::CreatedNew)
            }
            Ok(SingleCreate::Duplicate { existing_id }) => {
                info!(
                    "[Coordinator] record exists for {}/{}; updating {} instead",
                    student_id, month, existing_id
                );
                let change = FeeChange::new(&existing_id).with_paid_amount(paid_amount);
                match inner.gateway.update_fees(&[change]).await {
                    Ok(echoes) => {
                        let ttl = inner.success_ttl();
                        let mut state = inner.state.write().await;
                        if inner.liveness.is_alive() {
                            for echo in &echoes {
                                state.store.apply_echo(echo);
                            }
                            state.notices.push(
                                NoticeKind::Success,
                                "A record for this student and month already existed; its payment was updated.",
                                ttl,
                            );
                        }
                        Ok(SaveOutcome::UpdatedExisting)
                    }
                    Err(err) => Err(self.report_failure("save the payment", err).await),
                }
            }
            Err(err) => Err(self.report_failure("create the fee record", err).await),
        }
    }

    /// Create one fee record per active student of a school for a
    /// month. An unconfirmed overwrite comes back as
    /// [`BatchCreate::NeedsConfirmation`]; it is never resolved
    /// automatically; re-invoke with `force_overwrite` once the user
    /// has confirmed.
    pub async fn create_monthly_batch(
        &self,
        school_id: &str,
        month: &str,
        force_overwrite: bool,
    ) -> Result<BatchCreate> {
        let inner = self.inner().clone();
        let _guard = inner
            .busy
            .try_begin(OpKind::BatchCreate)
            .ok_or(SyncError::Busy(OpKind::BatchCreate))?;

        match inner
            .gateway
            .create_monthly_batch(school_id, month, force_overwrite)
            .await
        {
            Ok(BatchCreate::Created { message }) => {
                info!("[Coordinator] month run created for {}/{}", school_id, month);
                {
                    let ttl = inner.success_ttl();
                    let mut state = inner.state.write().await;
                    if inner.liveness.is_alive() {
                        state.notices.push(NoticeKind::Success, message.clone(), ttl);
                    }
                }
                // The batch response carries no records.
                run_reload(inner.clone()).await;
                Ok(BatchCreate::Created { message })
            }
            Ok(BatchCreate::NeedsConfirmation { warning }) => {
                info!(
                    "[Coordinator] month run for {}/{} needs confirmation",
                    school_id, month
                );
                let ttl = inner.error_ttl();
                let mut state = inner.state.write().await;
                if inner.liveness.is_alive() {
                    state.notices.push(NoticeKind::Warning, warning.clone(), ttl);
                }
                Ok(BatchCreate::NeedsConfirmation { warning })
            }
            Err(err) => Err(
                self.report_failure("create the month's fee records", err)
                    .await,
            ),
        }
    }

    /// Update one record's payment fields. On success only the fields
    /// the gateway echoes back are merged onto the store entry.
    pub async fn update_fee(
        &self,
        id: &str,
        paid_amount: Option<Decimal>,
        date_received: Option<NaiveDate>,
    ) -> Result<()> {
        let inner = self.inner().clone();
        let _guard = inner
            .busy
            .try_begin(OpKind::Update)
            .ok_or(SyncError::Busy(OpKind::Update))?;

        let change = FeeChange {
            id: id.to_string(),
            paid_amount,
            date_received,
        };
        match inner.gateway.update_fees(&[change]).await {
            Ok(echoes) => {
                let ttl = inner.success_ttl();
                let mut state = inner.state.write().await;
                if inner.liveness.is_alive() {
                    for echo in &echoes {
                        state.store.apply_echo(echo);
                    }
                    state.notices.push(NoticeKind::Success, "Payment recorded.", ttl);
                }
                Ok(())
            }
            Err(err) => Err(self.report_failure("save the payment", err).await),
        }
    }

    /// Set the same paid amount on several records at once.
    ///
    /// Validated client-side before any network call: the amount must
    /// be non-negative and must not exceed any selected record's
    /// total fee. The first violation aborts the whole batch, since a
    /// partial apply would leave the selection in a state no one
    /// asked for. On success the selection set is cleared.
    pub async fn bulk_update(&self, ids: &[String], paid_amount: Decimal) -> Result<()> {
        let inner = self.inner().clone();
        let _guard = inner
            .busy
            .try_begin(OpKind::Update)
            .ok_or(SyncError::Busy(OpKind::Update))?;

        if paid_amount < Decimal::ZERO {
            return Err(
                self.reject_validation("Paid amount cannot be negative.".to_string())
                    .await,
            );
        }
        let violation = {
            let state = inner.state.read().await;
            let mut found = None;
            for id in ids {
                let Some(rec) = state.store.get(id) else {
                    return Err(SyncError::UnknownId(id.clone()));
                };
                if paid_amount > rec.total_fee {
                    found = Some(format!(
                        "Paid amount {} exceeds the total fee {} for {}.",
                        paid_amount, rec.total_fee, rec.student_name
                    ));
                    break;
                }
            }
            found
        };
        if let Some(message) = violation {
            return Err(self.reject_validation(message).await);
        }

        let changes: Vec<FeeChange> = ids
            .iter()
            .map(|id| FeeChange::new(id).with_paid_amount(paid_amount))
            .collect();
        match inner.gateway.update_fees(&changes).await {
            Ok(echoes) => {
                info!("[Coordinator] bulk-updated {} records", echoes.len());
                let ttl = inner.success_ttl();
                let mut state = inner.state.write().await;
                if inner.liveness.is_alive() {
                    for echo in &echoes {
                        state.store.apply_echo(echo);
                    }
                    state.selection.clear();
                    state.notices.push(
                        NoticeKind::Success,
                        format!("Updated {} fee records.", echoes.len()),
                        ttl,
                    );
                }
                Ok(())
            }
            Err(err) => Err(self.report_failure("save the payments", err).await),
        }
    }

    /// Delete records. Never optimistic: rows stay visible until the
    /// gateway confirms, because a failed delete must leave the data
    /// on screen.
    pub async fn delete_many(&self, ids: &[String]) -> Result<()> {
        let inner = self.inner().clone();
        let _guard = inner
            .busy
            .try_begin(OpKind::Delete)
            .ok_or(SyncError::Busy(OpKind::Delete))?;

        if ids.is_empty() {
            return Ok(());
        }
        match inner.gateway.delete_fees(ids).await {
            Ok(()) => {
                info!("[Coordinator] deleted {} records", ids.len());
                let ttl = inner.success_ttl();
                let removed: HashSet<String> = ids.iter().cloned().collect();
                let mut state = inner.state.write().await;
                if inner.liveness.is_alive() {
                    state.store.remove_ids(&removed);
                    for id in ids {
                        state.selection.remove(id);
                    }
                    state.notices.push(
                        NoticeKind::Success,
                        format!("Deleted {} fee records.", ids.len()),
                        ttl,
                    );
                }
                Ok(())
            }
            Err(err) => Err(self.report_failure("delete the selected records", err).await),
        }
    }

    async fn report_failure(&self, what: &str, err: GatewayError) -> SyncError {
        warn!("[Coordinator] could not {}: {}", what, err);
        let inner = self.inner();
        let ttl = inner.error_ttl();
        let mut state = inner.state.write().await;
        if inner.liveness.is_alive() {
            state.notices.push(
                NoticeKind::Error,
                format!("Could not {what}. Please try again."),
                ttl,
            );
        }
        SyncError::Gateway(err)
    }

    async fn reject_validation(&self, message: String) -> SyncError {
        warn!("[Coordinator] bulk update rejected: {}", message);
        let inner = self.inner();
        let ttl = inner.error_ttl();
        let mut state = inner.state.write().await;
        if inner.liveness.is_alive() {
            state.notices.push(NoticeKind::Error, message.clone(), ttl);
        }
        SyncError::Validation(message)
    }
}
