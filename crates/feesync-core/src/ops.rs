//! Per-operation-kind busy flags.
//!
//! One narrow flag per mutation kind, so the UI disables only the
//! relevant controls: an in-flight delete does not block recording a
//! payment. The flag doubles as a double-submit guard: a second
//! same-kind submission is rejected while the first is in flight.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The mutation kinds tracked by busy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Create,
    BatchCreate,
    Update,
    Delete,
}

impl OpKind {
    const ALL: usize = 4;

    #[inline]
    fn index(self) -> usize {
        match self {
            OpKind::Create => 0,
            OpKind::BatchCreate => 1,
            OpKind::Update => 2,
            OpKind::Delete => 3,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Create => "create",
            OpKind::BatchCreate => "batch create",
            OpKind::Update => "update",
            OpKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
pub struct BusyFlags {
    flags: [AtomicBool; OpKind::ALL],
}

impl BusyFlags {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[inline]
    pub fn is_busy(&self, kind: OpKind) -> bool {
        self.flags[kind.index()].load(Ordering::Acquire)
    }

    /// Claim the flag for one operation. `None` means a same-kind
    /// operation is already in flight.
    pub fn try_begin(self: &Arc<Self>, kind: OpKind) -> Option<OpGuard> {
        let claimed = self.flags[kind.index()]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        claimed.then(|| OpGuard {
            flags: self.clone(),
            kind,
        })
    }
}

/// Releases the flag when the operation finishes, on every exit path.
#[derive(Debug)]
pub struct OpGuard {
    flags: Arc<BusyFlags>,
    kind: OpKind,
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.flags.flags[self.kind.index()].store(false, Ordering::Release);
    }
}
