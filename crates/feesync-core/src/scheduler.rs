//! Debounced reload scheduling.
//!
//! One pending deadline, rearmed on every reload-relevant filter
//! change (trailing debounce): the reload fires only after the
//! filters have been quiet for the configured window, so a user
//! picking school-then-class-then-month costs one fetch, not three.

use crate::session::{self, SessionInner};
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::debug;

pub(crate) struct ReloadScheduler {
    tx: mpsc::Sender<()>,
}

impl ReloadScheduler {
    /// Spawn the timer loop. The loop holds only a weak session
    /// reference and exits when the session is dropped or shut down.
    pub(crate) fn spawn(session: Weak<SessionInner>, window: Duration) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(run_loop(rx, session, window));
        ReloadScheduler { tx }
    }

    /// Rearm the pending deadline. A full channel just means a
    /// notification is already queued, which rearms the same timer.
    pub(crate) fn notify_filter_changed(&self) {
        let _ = self.tx.try_send(());
    }
}

async fn run_loop(mut rx: mpsc::Receiver<()>, session: Weak<SessionInner>, window: Duration) {
    let mut deadline: Option<Instant> = None;
    loop {
        let wait = async move {
            match deadline {
                Some(d) => time::sleep_until(d).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            msg = rx.recv() => match msg {
                Some(()) => {
                    deadline = Some(Instant::now() + window);
                    debug!("[Scheduler] filter changed, reload armed in {:?}", window);
                }
                None => break,
            },
            _ = wait => {
                deadline = None;
                let Some(inner) = session.upgrade() else { break };
                if !inner.liveness.is_alive() {
                    break;
                }
                debug!("[Scheduler] debounce window elapsed, firing reload");
                tokio::spawn(session::run_reload(inner));
            }
        }
    }
    debug!("[Scheduler] timer loop stopped");
}
