//! The fee record as the gateway serves it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Payment status of a fee record, computed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeStatus {
    Paid,
    Pending,
    Overdue,
}

/// One student's fee obligation and payment state for one month.
///
/// `total_fee`, `balance_due` and `status` are owned by the gateway:
/// the client stores whatever the last response said and never
/// recomputes them for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecord {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub student_class: String,
    pub total_fee: Decimal,
    pub paid_amount: Decimal,
    pub balance_due: Decimal,
    /// Date of the most recent payment. The gateway sends `null` or an
    /// empty string when no payment was recorded; both decode to `None`
    /// so downstream sorting has a single absent marker.
    #[serde(default, deserialize_with = "de_opt_date")]
    pub date_received: Option<NaiveDate>,
    pub status: FeeStatus,
    pub month: String,
}

fn de_opt_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
