// ── Data session ──
//
// Owns the location listing state and every operation that mutates it.
// All loads funnel through `DataSession::load`, which fences responses
// with a monotonically increasing ticket so only the most recent request
// can install data.

mod state;
mod stream;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{FilterCriteria, LocationRecord, PAGE_SIZE_OPTIONS, RecordId};
use crate::policy::{self, LoadRequest};
use crate::service::DataService;

pub use state::{LoadOutcome, LoadPhase, SessionState};
pub use stream::{SessionWatchStream, StateStream};

/// The dashboard's data session.
///
/// Cheaply cloneable via `Arc`. Observers read snapshots or subscribe to
/// changes; mutations go through the async load operations below and
/// through [`select_record`](Self::select_record).
pub struct DataSession<S: DataService> {
    inner: Arc<SessionInner<S>>,
}

impl<S: DataService> Clone for DataSession<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct SessionInner<S> {
    service: S,
    state: watch::Sender<SessionState>,
    /// Ticket of the most recently started load.
    ticket: AtomicU64,
    cancel: CancellationToken,
}

impl<S: DataService> DataSession<S> {
    /// Create an idle session. Nothing is fetched until the first load.
    pub fn new(service: S, page_size: u32) -> Self {
        let (state, _) = watch::channel(SessionState::new(page_size.max(1)));
        Self {
            inner: Arc::new(SessionInner {
                service,
                state,
                ticket: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        }
    }

    /// The underlying data service.
    pub fn service(&self) -> &S {
        &self.inner.service
    }

    // ── Observation ──────────────────────────────────────────────────

    /// Point-in-time copy of the session state.
    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Raw watch receiver.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Snapshot plus change notifications.
    pub fn stream(&self) -> StateStream {
        StateStream::new(self.inner.state.subscribe())
    }

    /// The selected record, if any.
    pub fn selected_record(&self) -> Option<LocationRecord> {
        self.inner.state.borrow().selected_record().cloned()
    }

    // ── Load operations ──────────────────────────────────────────────

    /// Reload with the current filters, page and limit.
    pub async fn refresh(&self) -> Result<LoadOutcome, CoreError> {
        self.load(LoadRequest::default()).await
    }

    /// Install new filter criteria and reload from page 1.
    pub async fn apply_filters(&self, criteria: FilterCriteria) -> Result<LoadOutcome, CoreError> {
        criteria.validate()?;
        self.load(LoadRequest {
            filters: Some(criteria),
            page: Some(1),
            limit: None,
        })
        .await
    }

    /// Drop all filters and reload from page 1.
    pub async fn clear_filters(&self) -> Result<LoadOutcome, CoreError> {
        self.apply_filters(FilterCriteria::all()).await
    }

    /// Jump to page `page`. Out-of-range pages are ignored.
    pub async fn change_page(&self, page: u32) -> Result<LoadOutcome, CoreError> {
        let in_range = self.inner.state.borrow().pagination.contains_page(page);
        if !in_range {
            debug!(page, "page out of range, ignoring");
            return Ok(LoadOutcome::Skipped);
        }
        self.load(LoadRequest {
            page: Some(page),
            ..LoadRequest::default()
        })
        .await
    }

    /// Switch page size and reload from page 1.
    pub async fn change_limit(&self, limit: u32) -> Result<LoadOutcome, CoreError> {
        if !PAGE_SIZE_OPTIONS.contains(&limit) {
            return Err(CoreError::validation(format!(
                "page size {limit} is not one of {PAGE_SIZE_OPTIONS:?}"
            )));
        }
        self.load(LoadRequest {
            page: Some(1),
            limit: Some(limit),
            ..LoadRequest::default()
        })
        .await
    }

    pub async fn go_to_next_page(&self) -> Result<LoadOutcome, CoreError> {
        let (has_next, current) = {
            let s = self.inner.state.borrow();
            (s.pagination.has_next_page, s.pagination.current_page)
        };
        if !has_next {
            return Ok(LoadOutcome::Skipped);
        }
        self.change_page(current + 1).await
    }

    pub async fn go_to_previous_page(&self) -> Result<LoadOutcome, CoreError> {
        let (has_previous, current) = {
            let s = self.inner.state.borrow();
            (s.pagination.has_previous_page, s.pagination.current_page)
        };
        if !has_previous {
            return Ok(LoadOutcome::Skipped);
        }
        self.change_page(current - 1).await
    }

    /// The single load primitive every operation above goes through.
    async fn load(&self, request: LoadRequest) -> Result<LoadOutcome, CoreError> {
        if self.inner.cancel.is_cancelled() {
            return Err(CoreError::SessionClosed);
        }

        let query = {
            let s = self.inner.state.borrow();
            policy::resolve_query(
                &s.query.filters,
                s.query.page,
                s.query.limit,
                request,
            )
        };
        query.filters.validate()?;

        let ticket = self.inner.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.state.send_modify(|s| {
            s.phase = LoadPhase::Loading;
            s.query = query.clone();
        });
        debug!(ticket, page = query.page, limit = query.limit, "loading locations");

        let result = tokio::select! {
            biased;
            () = self.inner.cancel.cancelled() => return Ok(LoadOutcome::Superseded),
            result = self.inner.service.fetch_page(&query) => result,
        };

        if self.inner.ticket.load(Ordering::SeqCst) != ticket {
            warn!(ticket, "discarding stale location response");
            return Ok(LoadOutcome::Superseded);
        }

        match result {
            Ok(page) => {
                let outside = page
                    .records
                    .iter()
                    .filter(|r| !query.filters.matches(r))
                    .count();
                if outside > 0 {
                    warn!(outside, "server returned records outside the active filter");
                }

                self.inner.state.send_modify(|s| {
                    s.selected = policy::reconcile_selection(s.selected, &page.records);
                    s.query.page = page.pagination.current_page;
                    s.query.limit = page.pagination.limit;
                    s.records = Arc::new(page.records);
                    s.devices = Arc::new(page.devices);
                    s.pagination = page.pagination;
                    s.error = None;
                    s.phase = LoadPhase::Loaded;
                    s.last_loaded = Some(Utc::now());
                });
                Ok(LoadOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, "location load failed");
                self.inner.state.send_modify(|s| {
                    s.phase = LoadPhase::Error;
                    s.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Select a record on the current page. Returns `false` (and leaves
    /// the selection alone) when `id` is not on the page.
    pub fn select_record(&self, id: RecordId) -> bool {
        self.inner.state.send_if_modified(|s| {
            if !s.records.iter().any(|r| r.id == id) || s.selected == Some(id) {
                return false;
            }
            s.selected = Some(id);
            true
        });
        self.inner.state.borrow().selected == Some(id)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Reload every `period` until the session is closed.
    pub fn spawn_auto_refresh(&self, period: Duration) -> JoinHandle<()> {
        let session = self.clone();
        let cancel = self.inner.cancel.child_token();
        tokio::spawn(refresh_task(session, period, cancel))
    }

    /// Cancel in-flight loads and refuse new ones.
    pub fn close(&self) {
        if !self.inner.cancel.is_cancelled() {
            info!("closing data session");
        }
        self.inner.cancel.cancel();
        self.inner.state.send_if_modified(|s| {
            if s.phase != LoadPhase::Loading {
                return false;
            }
            s.phase = if s.error.is_some() {
                LoadPhase::Error
            } else if s.last_loaded.is_some() {
                LoadPhase::Loaded
            } else {
                LoadPhase::Idle
            };
            true
        });
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

// ── Background tasks ─────────────────────────────────────────────────

async fn refresh_task<S: DataService>(
    session: DataSession<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = session.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
