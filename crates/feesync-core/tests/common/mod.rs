//! A scriptable in-memory gateway for driving the engine in tests.
//!
//! Behaves like the real server for the happy paths (one record per
//! student and month, server-derived totals and status) and exposes
//! knobs for latency and failure injection so races and error paths
//! can be exercised deterministically.

#![allow(dead_code)]

use async_trait::async_trait;
use feesync_http::{
    BatchCreate, FeeChange, FeeGateway, FeeQuery, FeeRecord, FeeStatus, GatewayError,
    SingleCreate, StudentSummary,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeGateway {
    state: Mutex<ServerState>,
}

#[derive(Default)]
struct ServerState {
    students: Vec<StudentSummary>,
    fees: Vec<FeeRecord>,
    next_id: u64,
    default_total: Option<Decimal>,
    list_delays: VecDeque<u64>,
    update_delays: VecDeque<u64>,
    fail_lists: u32,
    fail_updates: u32,
    fail_deletes: u32,
    batch_warning: Option<String>,
    list_calls: u32,
    update_calls: u32,
    delete_calls: u32,
}

impl FakeGateway {
    pub fn new() -> Self {
        FakeGateway {
            state: Mutex::new(ServerState::default()),
        }
    }

    pub fn seed_student(&self, id: &str, name: &str, class: &str) {
        self.state.lock().unwrap().students.push(StudentSummary {
            id: id.to_string(),
            name: name.to_string(),
            class: class.to_string(),
        });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn seed_fee(
        &self,
        id: &str,
        student_id: &str,
        name: &str,
        class: &str,
        total: i64,
        paid: i64,
        month: &str,
    ) {
        let record = make_record(id, student_id, name, class, Decimal::from(total), Decimal::from(paid), month);
        self.state.lock().unwrap().fees.push(record);
    }

    /// Total fee the "server" assigns on create (default 1000).
    pub fn set_default_total(&self, total: i64) {
        self.state.lock().unwrap().default_total = Some(Decimal::from(total));
    }

    /// Delay the next `list_fees` call by this many milliseconds.
    /// Queued delays apply to successive calls in order.
    pub fn push_list_delay(&self, ms: u64) {
        self.state.lock().unwrap().list_delays.push_back(ms);
    }

    pub fn push_update_delay(&self, ms: u64) {
        self.state.lock().unwrap().update_delays.push_back(ms);
    }

    pub fn fail_next_list(&self) {
        self.state.lock().unwrap().fail_lists += 1;
    }

    pub fn fail_next_update(&self) {
        self.state.lock().unwrap().fail_updates += 1;
    }

    pub fn fail_next_delete(&self) {
        self.state.lock().unwrap().fail_deletes += 1;
    }

    /// Make unforced batch creation collide, like a month that was
    /// already generated.
    pub fn set_batch_warning(&self, warning: &str) {
        self.state.lock().unwrap().batch_warning = Some(warning.to_string());
    }

    pub fn list_calls(&self) -> u32 {
        self.state.lock().unwrap().list_calls
    }

    pub fn update_calls(&self) -> u32 {
        self.state.lock().unwrap().update_calls
    }

    pub fn delete_calls(&self) -> u32 {
        self.state.lock().unwrap().delete_calls
    }

    /// Server-side record for assertions about remote truth.
    pub fn server_fee(&self, id: &str) -> Option<FeeRecord> {
        self.state
            .lock()
            .unwrap()
            .fees
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }

    pub fn server_fee_count(&self) -> usize {
        self.state.lock().unwrap().fees.len()
    }
}

fn make_record(
    id: &str,
    student_id: &str,
    name: &str,
    class: &str,
    total: Decimal,
    paid: Decimal,
    month: &str,
) -> FeeRecord {
    FeeRecord {
        id: id.to_string(),
        student_id: student_id.to_string(),
        student_name: name.to_string(),
        student_class: class.to_string(),
        total_fee: total,
        paid_amount: paid,
        balance_due: total - paid,
        date_received: None,
        status: if paid >= total {
            FeeStatus::Paid
        } else {
            FeeStatus::Pending
        },
        month: month.to_string(),
    }
}

fn server_error(message: &str) -> GatewayError {
    GatewayError::Status {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl FeeGateway for FakeGateway {
    async fn list_fees(&self, query: &FeeQuery) -> feesync_http::Result<Vec<FeeRecord>> {
        let (delay, outcome) = {
            let mut state = self.state.lock().unwrap();
            state.list_calls += 1;
            let delay = state.list_delays.pop_front().unwrap_or(0);
            let outcome = if state.fail_lists > 0 {
                state.fail_lists -= 1;
                Err(server_error("list failed"))
            } else {
                Ok(state
                    .fees
                    .iter()
                    .filter(|f| {
                        query
                            .student_class
                            .as_ref()
                            .is_none_or(|c| &f.student_class == c)
                            && query.month.as_ref().is_none_or(|m| &f.month == m)
                    })
                    .cloned()
                    .collect::<Vec<_>>())
            };
            (delay, outcome)
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        outcome
    }

    async fn create_monthly_batch(
        &self,
        _school_id: &str,
        month: &str,
        force_overwrite: bool,
    ) -> feesync_http::Result<BatchCreate> {
        let mut state = self.state.lock().unwrap();
        if let Some(warning) = state.batch_warning.clone() {
            if !force_overwrite {
                return Ok(BatchCreate::NeedsConfirmation { warning });
            }
        }
        let total = state.default_total.unwrap_or_else(|| Decimal::from(1000));
        let students = state.students.clone();
        state
            .fees
            .retain(|f| !(f.month == month && students.iter().any(|s| s.id == f.student_id)));
        for student in &students {
            state.next_id += 1;
            let id = format!("gen-{}", state.next_id);
            let record = make_record(
                &id,
                &student.id,
                &student.name,
                &student.class,
                total,
                Decimal::ZERO,
                month,
            );
            state.fees.push(record);
        }
        Ok(BatchCreate::Created {
            message: format!("Created {} fee records for {month}", students.len()),
        })
    }

    async fn create_single(
        &self,
        student_id: &str,
        month: &str,
        paid_amount: Decimal,
    ) -> feesync_http::Result<SingleCreate> {
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .fees
            .iter()
            .find(|f| f.student_id == student_id && f.month == month)
        {
            return Ok(SingleCreate::Duplicate {
                existing_id: existing.id.clone(),
            });
        }
        let total = state.default_total.unwrap_or_else(|| Decimal::from(1000));
        let (name, class) = state
            .students
            .iter()
            .find(|s| s.id == student_id)
            .map(|s| (s.name.clone(), s.class.clone()))
            .unwrap_or_else(|| (format!("Student {student_id}"), "Class 1".to_string()));
        state.next_id += 1;
        let id = format!("gen-{}", state.next_id);
        let record = make_record(&id, student_id, &name, &class, total, paid_amount, month);
        state.fees.push(record.clone());
        Ok(SingleCreate::Created(record))
    }

    async fn update_fees(&self, changes: &[FeeChange]) -> feesync_http::Result<Vec<FeeRecord>> {
        let (delay, outcome) = {
            let mut state = self.state.lock().unwrap();
            state.update_calls += 1;
            let delay = state.update_delays.pop_front().unwrap_or(0);
            let outcome = if state.fail_updates > 0 {
                state.fail_updates -= 1;
                Err(server_error("update failed"))
            } else {
                let mut echoes = Vec::with_capacity(changes.len());
                let mut missing = None;
                for change in changes {
                    match state.fees.iter_mut().find(|f| f.id == change.id) {
                        Some(fee) => {
                            if let Some(paid) = change.paid_amount {
                                fee.paid_amount = paid;
                            }
                            if let Some(date) = change.date_received {
                                fee.date_received = Some(date);
                            }
                            fee.balance_due = fee.total_fee - fee.paid_amount;
                            fee.status = if fee.paid_amount >= fee.total_fee {
                                FeeStatus::Paid
                            } else {
                                FeeStatus::Pending
                            };
                            echoes.push(fee.clone());
                        }
                        None => {
                            missing = Some(change.id.clone());
                            break;
                        }
                    }
                }
                match missing {
                    Some(id) => Err(GatewayError::Status {
                        status: 404,
                        message: format!("no fee record {id}"),
                    }),
                    None => Ok(echoes),
                }
            };
            (delay, outcome)
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        outcome
    }

    async fn delete_fees(&self, ids: &[String]) -> feesync_http::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls += 1;
        if state.fail_deletes > 0 {
            state.fail_deletes -= 1;
            return Err(server_error("delete failed"));
        }
        state.fees.retain(|f| !ids.contains(&f.id));
        Ok(())
    }

    async fn list_students(&self, _school_id: &str) -> feesync_http::Result<Vec<StudentSummary>> {
        Ok(self.state.lock().unwrap().students.clone())
    }
}
