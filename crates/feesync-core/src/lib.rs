//! feesync-core: client-side synchronization engine for fee records.
//!
//! This crate keeps an in-memory [`store::FeeStore`] consistent with
//! the remote fee gateway without a full reload after every edit:
//!
//! - **scope**: the active (school, class, month, search) filter; the
//!   reload-relevant parts arm a trailing debounce window.
//! - **scheduler**: one pending timer, rearmed per filter change,
//!   firing at most one reload per quiet window.
//! - **session / coordinator**: the mutation surface, from single create
//!   with automatic conflict fallback, batch create behind explicit
//!   confirmation, targeted update merges, fail-fast bulk validation,
//!   non-optimistic delete.
//! - **view**: pure search/sort/group/totals recomputation; never
//!   mutates the store.
//!
//! Staleness is handled with liveness tickets rather than request
//! cancellation: in-flight responses are allowed to complete and are
//! discarded on arrival if the filter scope moved on or the session
//! shut down.

pub mod collate;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod liveness;
pub mod notice;
pub mod ops;
pub mod scheduler;
pub mod scope;
pub mod session;
pub mod store;
pub mod view;

pub use config::SessionConfig;
pub use coordinator::SaveOutcome;
pub use error::{Result, SyncError};
pub use notice::{Notice, NoticeKind};
pub use ops::OpKind;
pub use scope::{FilterScope, ScopePatch};
pub use session::FeeSession;
pub use view::{ClassGroup, FeeTotals, FeeView, SortDirection, SortKey, SortState};
