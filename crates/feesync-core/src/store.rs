//! The in-memory fee store: single source of truth for the UI.

use crate::collate::class_name_cmp;
use feesync_http::FeeRecord;
use std::collections::HashSet;

/// Authoritative list of fee records for the current filter scope.
///
/// Contents are replaced wholesale on reload and patched in place by
/// mutation echoes. All monetary and status fields hold whatever the
/// gateway last said; nothing is recomputed locally.
#[derive(Debug, Default)]
pub struct FeeStore {
    records: Vec<FeeRecord>,
}

impl FeeStore {
    #[inline]
    pub fn records(&self) -> &[FeeRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FeeRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace the whole store with a reload result, in ascending
    /// class order. The server pre-sorts too, but its collation is
    /// not trusted to match ours.
    pub fn replace_all(&mut self, mut records: Vec<FeeRecord>) {
        records.sort_by(|a, b| class_name_cmp(&a.student_class, &b.student_class));
        self.records = records;
    }

    /// Insert a freshly created record (or replace a record the
    /// gateway re-issued under the same id), keeping class order.
    pub fn upsert(&mut self, record: FeeRecord) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        } else {
            let at = self
                .records
                .partition_point(|r| class_name_cmp(&r.student_class, &record.student_class).is_le());
            self.records.insert(at, record);
        }
    }

    /// Merge an update echo onto the matching entry: only the fields
    /// the gateway recomputes on update (`paid_amount`, `balance_due`,
    /// `status`, `date_received`) are touched. Returns false when the
    /// record is not in the current scope.
    pub fn apply_echo(&mut self, echo: &FeeRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == echo.id) {
            Some(rec) => {
                rec.paid_amount = echo.paid_amount;
                rec.balance_due = echo.balance_due;
                rec.status = echo.status;
                rec.date_received = echo.date_received;
                true
            }
            None => false,
        }
    }

    /// Remove exactly the given ids; unknown ids are ignored.
    pub fn remove_ids(&mut self, ids: &HashSet<String>) {
        self.records.retain(|r| !ids.contains(&r.id));
    }
}
