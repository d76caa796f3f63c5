//! Field-level change sent to the update endpoint.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One entry of the `POST /fees/update` payload. Absent fields are
/// left untouched by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeChange {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_received: Option<NaiveDate>,
}

impl FeeChange {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            paid_amount: None,
            date_received: None,
        }
    }

    pub fn with_paid_amount(mut self, amount: Decimal) -> Self {
        self.paid_amount = Some(amount);
        self
    }

    pub fn with_date_received(mut self, date: NaiveDate) -> Self {
        self.date_received = Some(date);
        self
    }
}
