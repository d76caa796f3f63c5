pub mod change;
pub mod outcome;
pub mod query;
pub mod record;
pub mod student;

pub use change::FeeChange;
pub use outcome::{BatchCreate, SingleCreate};
pub use query::FeeQuery;
pub use record::{FeeRecord, FeeStatus};
pub use student::StudentSummary;
