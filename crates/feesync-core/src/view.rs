//! Pure derived views over the fee store.
//!
//! Everything here is recomputed from the current records, search
//! term and sort state on every read and never mutates the store.

use crate::collate::class_name_cmp;
use feesync_http::{FeeRecord, FeeStatus};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Ordering;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortKey {
    StudentName,
    StudentClass,
    TotalFee,
    PaidAmount,
    BalanceDue,
    DateReceived,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[inline]
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    #[inline]
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: SortKey::StudentClass,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// Clicking the active column flips direction; a new column
    /// starts ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            *self = SortState {
                key,
                direction: SortDirection::Ascending,
            };
        }
    }
}

/// Monetary sums plus a row count.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeeTotals {
    pub total_fee: Decimal,
    pub paid_amount: Decimal,
    pub balance_due: Decimal,
    pub count: usize,
}

impl FeeTotals {
    fn accumulate(&mut self, rec: &FeeRecord) {
        self.total_fee += rec.total_fee;
        self.paid_amount += rec.paid_amount;
        self.balance_due += rec.balance_due;
        self.count += 1;
    }
}

/// Rows of one class plus their subtotal.
#[derive(Debug, Clone, Serialize)]
pub struct ClassGroup {
    pub student_class: String,
    pub rows: Vec<FeeRecord>,
    pub subtotal: FeeTotals,
}

/// The render-ready projection: filtered rows in sort order, class
/// groups in collation order, grand totals over the filtered set.
#[derive(Debug, Clone, Serialize)]
pub struct FeeView {
    pub rows: Vec<FeeRecord>,
    pub groups: Vec<ClassGroup>,
    pub totals: FeeTotals,
}

pub fn build_view(records: &[FeeRecord], search_term: &str, sort: SortState) -> FeeView {
    let needle = search_term.trim().to_lowercase();
    let mut rows: Vec<FeeRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || r.student_name.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    rows.sort_by(|a, b| compare(a, b, sort));

    let mut groups: Vec<ClassGroup> = Vec::new();
    let mut totals = FeeTotals::default();
    for rec in &rows {
        totals.accumulate(rec);
        match groups
            .iter_mut()
            .find(|g| g.student_class == rec.student_class)
        {
            Some(group) => {
                group.subtotal.accumulate(rec);
                group.rows.push(rec.clone());
            }
            None => {
                let mut subtotal = FeeTotals::default();
                subtotal.accumulate(rec);
                groups.push(ClassGroup {
                    student_class: rec.student_class.clone(),
                    rows: vec![rec.clone()],
                    subtotal,
                });
            }
        }
    }
    groups.sort_by(|a, b| class_name_cmp(&a.student_class, &b.student_class));

    FeeView {
        rows,
        groups,
        totals,
    }
}

fn compare(a: &FeeRecord, b: &FeeRecord, sort: SortState) -> Ordering {
    if sort.key == SortKey::DateReceived {
        // Rows without a payment date mean "needs follow-up"; they
        // stay at the bottom in both directions, and only the
        // present dates flip with the toggle.
        return match (a.date_received, b.date_received) {
            (Some(da), Some(db)) => sort.direction.apply(da.cmp(&db)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
    }
    let ord = match sort.key {
        SortKey::StudentName => a
            .student_name
            .to_lowercase()
            .cmp(&b.student_name.to_lowercase()),
        SortKey::StudentClass => class_name_cmp(&a.student_class, &b.student_class),
        SortKey::TotalFee => a.total_fee.cmp(&b.total_fee),
        SortKey::PaidAmount => a.paid_amount.cmp(&b.paid_amount),
        SortKey::BalanceDue => a.balance_due.cmp(&b.balance_due),
        SortKey::Status => status_rank(a.status).cmp(&status_rank(b.status)),
        SortKey::DateReceived => Ordering::Equal,
    };
    sort.direction.apply(ord)
}

fn status_rank(status: FeeStatus) -> u8 {
    match status {
        FeeStatus::Paid => 0,
        FeeStatus::Pending => 1,
        FeeStatus::Overdue => 2,
    }
}
