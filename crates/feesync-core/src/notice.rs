//! Short-lived user-visible messages.
//!
//! Every mutation and reload reports through here instead of raising:
//! successes linger 5 s, errors and warnings 10 s (configurable), and
//! expired entries are pruned whenever the board is read.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Warning,
}

/// One dismissable message.
#[derive(Debug, Clone)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    #[inline]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: u64,
    items: Vec<Notice>,
}

impl NoticeBoard {
    pub fn push(&mut self, kind: NoticeKind, text: impl Into<String>, ttl: Duration) -> u64 {
        self.next_id += 1;
        self.items.push(Notice {
            id: self.next_id,
            kind,
            text: text.into(),
            expires_at: Instant::now() + ttl,
        });
        self.next_id
    }

    /// Prune expired entries and return what is still visible.
    pub fn active(&mut self) -> Vec<Notice> {
        self.items.retain(|n| !n.is_expired());
        self.items.clone()
    }

    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }
}
