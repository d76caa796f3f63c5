//! Student summaries for the single-fee student picker.

use serde::{Deserialize, Serialize};

/// One row of `GET /students?school_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub class: String,
}
