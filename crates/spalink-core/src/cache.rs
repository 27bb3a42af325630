// ── Status cache / request coalescer ──
//
// Single-flight over `GET /status`. At most one fetch is in flight per
// cache; callers arriving while it runs attach to the same shared future.
// Each fetch runs on its own task, so it settles on schedule even when every
// caller has given up on it. A settled fetch clears the in-flight marker
// (and, on success, records the snapshot) before its result is handed to any
// waiter, so a caller woken by that result can immediately start the next
// fetch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::time::Instant;
use tracing::trace;

use spalink_api::DeviceStatus;

use crate::backend::SpaBackend;
use crate::error::CoreError;

/// Outcome of a status read, shared by every caller of the same fetch.
pub type StatusResult = Result<Arc<DeviceStatus>, CoreError>;

type InFlight = Shared<BoxFuture<'static, StatusResult>>;

#[derive(Debug, Clone)]
struct Snapshot {
    status: Arc<DeviceStatus>,
    fetched_at: Instant,
}

#[derive(Default)]
struct CacheState {
    last: Option<Snapshot>,
    in_flight: Option<(u64, InFlight)>,
    next_fetch_id: u64,
}

impl CacheState {
    fn fresh(&self, min_interval: Duration) -> Option<Arc<DeviceStatus>> {
        self.last
            .as_ref()
            .filter(|s| s.fetched_at.elapsed() < min_interval)
            .map(|s| Arc::clone(&s.status))
    }

    /// Detach the in-flight handle if it belongs to fetch `id`.
    fn take_in_flight(&mut self, id: u64) -> Option<InFlight> {
        if self.in_flight.as_ref().is_some_and(|(current, _)| *current == id) {
            self.in_flight.take().map(|(_, fetch)| fetch)
        } else {
            None
        }
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight marker of one fetch on every exit path.
///
/// `settle` handles the normal completion; `Drop` covers a fetch task that
/// is torn down without completing (backend panic, runtime shutdown).
struct SettleGuard {
    state: Weak<Mutex<CacheState>>,
    id: u64,
}

impl SettleGuard {
    fn settle(self, result: &StatusResult) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let detached = {
            let mut state = lock(&state);
            if let Ok(status) = result {
                state.last = Some(Snapshot {
                    status: Arc::clone(status),
                    fetched_at: Instant::now(),
                });
            }
            state.take_in_flight(self.id)
        };
        trace!(fetch = self.id, ok = result.is_ok(), "status fetch settled");
        // Dropped outside the lock.
        drop(detached);
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let detached = lock(&state).take_in_flight(self.id);
            drop(detached);
        }
    }
}

enum Lookup {
    Fresh(Arc<DeviceStatus>),
    Pending(InFlight),
}

/// Caching, coalescing front for a [`SpaBackend`]'s status endpoint.
///
/// Three states: idle with a stale or missing snapshot, idle with a fresh
/// snapshot, and fetching. A failed fetch never evicts the previous
/// snapshot and is never retried automatically.
pub struct StatusCache<B> {
    backend: Arc<B>,
    min_interval: Duration,
    state: Arc<Mutex<CacheState>>,
}

impl<B: SpaBackend> StatusCache<B> {
    pub fn new(backend: Arc<B>, min_interval: Duration) -> Self {
        Self {
            backend,
            min_interval,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Current status: the fresh snapshot, the in-flight fetch, or a new one.
    pub async fn get(&self) -> StatusResult {
        match self.lookup() {
            Lookup::Fresh(status) => Ok(status),
            Lookup::Pending(fetch) => fetch.await,
        }
    }

    fn lookup(&self) -> Lookup {
        let mut state = lock(&self.state);

        if let Some((id, fetch)) = state.in_flight.as_ref() {
            trace!(fetch = id, "joining in-flight status fetch");
            return Lookup::Pending(fetch.clone());
        }

        if let Some(status) = state.fresh(self.min_interval) {
            trace!("serving cached status");
            return Lookup::Fresh(status);
        }

        Lookup::Pending(self.start_fetch(&mut state))
    }

    fn start_fetch(&self, state: &mut CacheState) -> InFlight {
        let id = state.next_fetch_id;
        state.next_fetch_id = state.next_fetch_id.wrapping_add(1);
        trace!(fetch = id, "starting status fetch");

        let backend = Arc::clone(&self.backend);
        let guard = SettleGuard {
            state: Arc::downgrade(&self.state),
            id,
        };
        let task = tokio::spawn(async move {
            let result = backend.fetch_status().await.map(Arc::new);
            guard.settle(&result);
            result
        });
        let fetch = task
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    Err(CoreError::Internal(format!("status fetch task failed: {e}")))
                })
            })
            .boxed()
            .shared();

        // The caller still holds the lock, so the task cannot settle before
        // its marker is in place.
        state.in_flight = Some((id, fetch.clone()));
        fetch
    }

    /// Last successful snapshot, however old, without fetching.
    pub fn cached(&self) -> Option<Arc<DeviceStatus>> {
        lock(&self.state).last.as_ref().map(|s| Arc::clone(&s.status))
    }

    /// When the last successful fetch settled.
    pub fn last_fetched(&self) -> Option<Instant> {
        lock(&self.state).last.as_ref().map(|s| s.fetched_at)
    }

    pub fn is_fetching(&self) -> bool {
        lock(&self.state).in_flight.is_some()
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
