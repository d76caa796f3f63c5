//! The fee session: unified state plus the reload path.
//!
//! Mutation operations live in [`crate::coordinator`]; this module
//! owns construction, filter changes, the reload pipeline and the
//! read surface (view, notices, selection).

use crate::config::SessionConfig;
use crate::liveness::{Liveness, Ticket};
use crate::notice::{Notice, NoticeBoard, NoticeKind};
use crate::ops::{BusyFlags, OpKind};
use crate::scheduler::ReloadScheduler;
use crate::scope::{FilterScope, ScopePatch};
use crate::store::FeeStore;
use crate::view::{self, FeeView, SortKey, SortState};
use feesync_http::{FeeGateway, StudentSummary};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Handle to one synchronization session. Cheap to clone; all clones
/// share the same store, scope and busy flags.
#[derive(Clone)]
pub struct FeeSession {
    inner: Arc<SessionInner>,
}

pub(crate) struct SessionInner {
    pub(crate) gateway: Arc<dyn FeeGateway>,
    pub(crate) config: SessionConfig,
    pub(crate) liveness: Arc<Liveness>,
    pub(crate) busy: Arc<BusyFlags>,
    pub(crate) loading: AtomicUsize,
    pub(crate) scheduler: ReloadScheduler,
    pub(crate) state: RwLock<SessionState>,
}

pub(crate) struct SessionState {
    pub(crate) store: FeeStore,
    pub(crate) scope: FilterScope,
    pub(crate) sort: SortState,
    pub(crate) selection: HashSet<String>,
    pub(crate) notices: NoticeBoard,
}

impl SessionInner {
    pub(crate) fn success_ttl(&self) -> Duration {
        Duration::from_millis(self.config.success_notice_ms)
    }

    pub(crate) fn error_ttl(&self) -> Duration {
        Duration::from_millis(self.config.error_notice_ms)
    }
}

impl FeeSession {
    /// Create a session. Must be called from within a tokio runtime:
    /// the reload scheduler spawns its timer loop here.
    pub fn new(gateway: Arc<dyn FeeGateway>, config: SessionConfig) -> Self {
        let window = Duration::from_millis(config.debounce_ms);
        let inner = Arc::new_cyclic(|weak| SessionInner {
            gateway,
            config,
            liveness: Arc::new(Liveness::new()),
            busy: BusyFlags::new(),
            loading: AtomicUsize::new(0),
            scheduler: ReloadScheduler::spawn(weak.clone(), window),
            state: RwLock::new(SessionState {
                store: FeeStore::default(),
                scope: FilterScope::default(),
                sort: SortState::default(),
                selection: HashSet::new(),
                notices: NoticeBoard::default(),
            }),
        });
        FeeSession { inner }
    }

    pub(crate) fn inner(&self) -> &Arc<SessionInner> {
        &self.inner
    }

    /// Merge a partial filter change. Changes to school, class or
    /// month invalidate in-flight reloads and arm the debounce
    /// window; search-term changes only affect the derived view.
    pub async fn set_filter(&self, patch: ScopePatch) {
        let mut state = self.inner.state.write().await;
        if !state.scope.apply(patch) {
            return;
        }
        // Any in-flight reload now belongs to an outdated scope.
        let epoch = self.inner.liveness.bump_epoch();
        if state.scope.wants_reload() {
            debug!("[Session] scope changed (epoch {}), scheduling reload", epoch);
            self.inner.scheduler.notify_filter_changed();
        } else {
            debug!("[Session] scope cleared (epoch {}), store left as-is", epoch);
        }
    }

    /// Reload immediately, bypassing the debounce window. Used after
    /// batch creation and for explicit refresh actions.
    pub async fn reload_now(&self) {
        run_reload(self.inner.clone()).await;
    }

    pub async fn scope(&self) -> FilterScope {
        self.inner.state.read().await.scope.clone()
    }

    /// Recompute the derived view from the current store, search term
    /// and sort state. Pure read; never mutates the store.
    pub async fn view(&self) -> FeeView {
        let state = self.inner.state.read().await;
        view::build_view(state.store.records(), &state.scope.search_term, state.sort)
    }

    /// Toggle sorting: a repeated column flips direction, a new
    /// column starts ascending.
    pub async fn toggle_sort(&self, key: SortKey) {
        self.inner.state.write().await.sort.toggle(key);
    }

    pub async fn sort(&self) -> SortState {
        self.inner.state.read().await.sort
    }

    pub async fn select(&self, id: impl Into<String>) {
        self.inner.state.write().await.selection.insert(id.into());
    }

    pub async fn deselect(&self, id: &str) {
        self.inner.state.write().await.selection.remove(id);
    }

    pub async fn clear_selection(&self) {
        self.inner.state.write().await.selection.clear();
    }

    pub async fn selection(&self) -> Vec<String> {
        let state = self.inner.state.read().await;
        let mut ids: Vec<String> = state.selection.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Visible notices, oldest first; expired ones are pruned here.
    pub async fn notices(&self) -> Vec<Notice> {
        self.inner.state.write().await.notices.active()
    }

    pub async fn dismiss_notice(&self, id: u64) {
        self.inner.state.write().await.notices.dismiss(id);
    }

    /// Student summaries for the single-fee picker. Pass-through to
    /// the gateway; the result is not stored.
    pub async fn students(&self, school_id: &str) -> crate::Result<Vec<StudentSummary>> {
        Ok(self.inner.gateway.list_students(school_id).await?)
    }

    /// True while any reload is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire) > 0
    }

    pub fn is_busy(&self, kind: OpKind) -> bool {
        self.inner.busy.is_busy(kind)
    }

    /// Tear down: cancels the debounce timer and suppresses store
    /// writes from anything still in flight. Requests themselves are
    /// not aborted; their results are discarded on arrival.
    pub fn shutdown(&self) {
        info!("[Session] shutting down");
        self.inner.liveness.revoke();
    }
}

/// Fetch the list for the current scope and commit it if it is still
/// relevant when it lands.
pub(crate) async fn run_reload(inner: Arc<SessionInner>) {
    if !inner.liveness.is_alive() {
        return;
    }
    let (query, ticket) = {
        let state = inner.state.read().await;
        if !state.scope.wants_reload() {
            return;
        }
        (state.scope.to_query(), Ticket::issue(&inner.liveness))
    };

    inner.loading.fetch_add(1, Ordering::AcqRel);
    let result = inner.gateway.list_fees(&query).await;
    inner.loading.fetch_sub(1, Ordering::AcqRel);

    let mut state = inner.state.write().await;
    if !ticket.still_current() {
        debug!("[Session] discarding stale reload (epoch {})", ticket.epoch());
        return;
    }
    match result {
        Ok(records) => {
            info!("[Session] loaded {} fee records", records.len());
            state.store.replace_all(records);
        }
        Err(err) => {
            warn!("[Session] reload failed: {}", err);
            let ttl = inner.error_ttl();
            state.notices.push(
                NoticeKind::Error,
                "Could not load fee records. Please try again.",
                ttl,
            );
        }
    }
}
