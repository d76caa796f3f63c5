//! Liveness tokens: "is this response still relevant?"
//!
//! There is no server-side cancellation; in-flight requests run to
//! completion and their results are checked here before they may
//! touch shared state. Two things can invalidate a result: the
//! session shut down, or the filter scope moved to a newer epoch.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Shared liveness state for one session.
#[derive(Debug)]
pub struct Liveness {
    alive: AtomicBool,
    epoch: AtomicU64,
}

impl Liveness {
    pub fn new() -> Self {
        Liveness {
            alive: AtomicBool::new(true),
            epoch: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Tear down: no store write may commit after this returns.
    pub fn revoke(&self) {
        self.alive.store(false, Ordering::Release);
    }

    /// Advance the scope epoch, invalidating every ticket issued for
    /// earlier epochs.
    pub fn bump_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    pub fn current_epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot taken when an asynchronous operation starts; checked
/// again at its commit point.
#[derive(Debug, Clone)]
pub struct Ticket {
    liveness: Arc<Liveness>,
    epoch: u64,
}

impl Ticket {
    pub fn issue(liveness: &Arc<Liveness>) -> Self {
        Ticket {
            liveness: liveness.clone(),
            epoch: liveness.current_epoch(),
        }
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True while the session lives and no newer scope epoch exists.
    #[must_use]
    pub fn still_current(&self) -> bool {
        self.liveness.is_alive() && self.liveness.current_epoch() == self.epoch
    }
}
