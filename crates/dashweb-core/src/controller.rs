//! Debounced search + paginated list controller
//!
//! The controller owns the [`ListState`] of one list view. Every fetch it
//! dispatches is tagged with a sequence number; a resolving fetch is applied
//! only when its number is still the highest one dispatched, so a slow
//! response can never overwrite the results of a newer request. There is no
//! way to cancel an in-flight fetch, the sequence check stands in for it.
//!
//! Lifecycle: `Idle` until the first fetch settles, `Loading` while the
//! latest fetch is outstanding, `Settled` afterwards. Failures are recorded
//! and returned but never leave the controller unusable.

use crate::debounce::Debouncer;
use crate::error::{CoreError, CoreResult, ErrorDetails};
use crate::pagination::PaginationWindow;
use crate::{ListItem, PageResponse, SourceRef};
use dashweb_config::ViewConfig;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::sync::watch;

/// Per-view controller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Quiet interval before a typed search term is applied
    pub debounce: Duration,
}

impl ControllerOptions {
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }
}

impl From<&ViewConfig> for ControllerOptions {
    fn from(view: &ViewConfig) -> Self {
        Self::new(view.debounce())
    }
}

/// Search input as typed and as last settled by the debouncer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    /// Updated on every keystroke
    pub raw_term: String,
    /// Updated once the quiet interval elapses
    pub debounced_term: String,
}

/// Parameters of one dispatched fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub sequence: u64,
    pub page: usize,
    pub term: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPhase {
    Idle,
    Loading,
    Settled,
}

/// What the list view renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub loading: bool,
    /// Sequence number of the fetch whose results are shown; 0 before the first
    pub last_applied_sequence: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            total_pages: 0,
            total_count: 0,
            loading: true,
            last_applied_sequence: 0,
        }
    }
}

/// Result of an operation that may trigger a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchOutcome {
    /// The fetch was the latest dispatch and its results are shown
    Applied,
    /// A newer fetch was dispatched before this one resolved
    Stale,
    /// Nothing to do (same page, same term, delete already pending)
    Skipped,
}

/// Serialisable view of the controller for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub phase: ListPhase,
    #[serde(flatten)]
    pub list: ListState<T>,
    pub query: SearchQuery,
    pub pending_deletes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<ErrorDetails>,
    /// Failures recorded so far; a repeat failure shows up as a new count
    pub errors_recorded: u64,
}

enum Settlement {
    Applied,
    Stale,
    /// The requested page is past the end; re-requested the last page instead
    Clamped(PageRequest),
}

struct Inner<T> {
    list: ListState<T>,
    phase: ListPhase,
    query: SearchQuery,
    /// Term of the latest dispatch
    fetched_term: String,
    /// Highest sequence number handed out
    dispatched: u64,
    /// Page and term of the last applied fetch, restored on failure
    settled_page: usize,
    settled_term: String,
    pending_deletes: BTreeSet<String>,
    last_error: Option<CoreError>,
    errors_recorded: u64,
}

impl<T: ListItem> Inner<T> {
    fn new() -> Self {
        Self {
            list: ListState::default(),
            phase: ListPhase::Idle,
            query: SearchQuery::default(),
            fetched_term: String::new(),
            dispatched: 0,
            settled_page: 1,
            settled_term: String::new(),
            pending_deletes: BTreeSet::new(),
            last_error: None,
            errors_recorded: 0,
        }
    }

    fn record_error(&mut self, error: CoreError) {
        self.last_error = Some(error);
        self.errors_recorded += 1;
    }

    fn dispatch(&mut self, page: usize, term: String) -> PageRequest {
        self.dispatched += 1;
        self.list.current_page = page;
        self.list.loading = true;
        self.phase = ListPhase::Loading;
        self.fetched_term = term.clone();

        PageRequest {
            sequence: self.dispatched,
            page,
            term,
        }
    }

    fn settle(
        &mut self,
        request: &PageRequest,
        result: CoreResult<PageResponse<T>>,
    ) -> CoreResult<Settlement> {
        if request.sequence != self.dispatched {
            return Ok(Settlement::Stale);
        }

        match result {
            Ok(response) => {
                let last_page = response.total_pages.max(1);
                if request.page > last_page {
                    return Ok(Settlement::Clamped(
                        self.dispatch(last_page, request.term.clone()),
                    ));
                }

                self.list.items = response.items;
                self.list.total_pages = response.total_pages;
                self.list.total_count = response.total_count;
                self.list.loading = false;
                self.list.last_applied_sequence = request.sequence;
                self.phase = ListPhase::Settled;
                self.settled_page = request.page;
                self.settled_term = request.term.clone();
                self.last_error = None;
                Ok(Settlement::Applied)
            }
            Err(source) => {
                let error = match source {
                    failure @ CoreError::FetchFailure { .. } => failure,
                    other => CoreError::FetchFailure {
                        page: request.page,
                        term: request.term.clone(),
                        message: other.to_string(),
                    },
                };

                // Items stay as they were; page and term follow them back
                self.list.loading = false;
                self.list.current_page = self.settled_page;
                self.fetched_term = self.settled_term.clone();
                self.phase = if self.list.last_applied_sequence == 0 {
                    ListPhase::Idle
                } else {
                    ListPhase::Settled
                };
                self.record_error(error.clone());
                Err(error)
            }
        }
    }
}

/// Controller for one paged, searchable list view
pub struct ListController<T: ListItem> {
    source: SourceRef<T>,
    options: ControllerOptions,
    inner: Mutex<Inner<T>>,
    debouncer: Debouncer<String>,
    revision: watch::Sender<u64>,
}

impl<T: ListItem> ListController<T> {
    /// Create a controller; must be called inside a tokio runtime
    pub fn new(source: SourceRef<T>, options: ControllerOptions) -> Arc<Self> {
        Arc::new_cyclic(|controller: &Weak<Self>| {
            let controller = controller.clone();
            let debouncer = Debouncer::new(options.debounce, move |term: String| {
                let Some(controller) = controller.upgrade() else {
                    return;
                };
                tokio::spawn(async move {
                    if let Err(error) = controller.on_debounced_term_change(term).await {
                        log::debug!(target: "dashweb::controller", "debounced search failed: {}", error);
                    }
                });
            });
            let (revision, _) = watch::channel(0);

            Self {
                source,
                options,
                inner: Mutex::new(Inner::new()),
                debouncer,
                revision,
            }
        })
    }

    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Initial load: empty search, page 1
    pub async fn mount(&self) -> CoreResult<FetchOutcome> {
        let request = {
            let mut inner = self.lock();
            inner.query = SearchQuery::default();
            inner.dispatch(1, String::new())
        };
        self.run(request).await
    }

    /// Echo a keystroke immediately and hand it to the debouncer
    pub fn set_search_term(&self, raw: impl Into<String>) {
        let raw = raw.into();
        self.lock().query.raw_term = raw.clone();
        self.notify();
        self.debouncer.emit(raw);
    }

    /// Apply a settled search term; fired by the debouncer.
    ///
    /// A term different from the last fetched one always restarts at page 1.
    /// Nothing is fetched once the controller has been shut down.
    pub async fn on_debounced_term_change(&self, term: String) -> CoreResult<FetchOutcome> {
        if self.debouncer.is_shut_down() {
            log::debug!(target: "dashweb::controller", "ignoring search '{}' after shutdown", term);
            return Ok(FetchOutcome::Skipped);
        }

        let request = {
            let mut inner = self.lock();
            inner.query.debounced_term = term.clone();
            if term == inner.fetched_term {
                None
            } else {
                Some(inner.dispatch(1, term))
            }
        };

        match request {
            Some(request) => self.run(request).await,
            None => {
                self.notify();
                Ok(FetchOutcome::Skipped)
            }
        }
    }

    /// Navigate to `page` under the current term
    pub async fn set_page(&self, page: usize) -> CoreResult<FetchOutcome> {
        let request = {
            let mut inner = self.lock();
            if page < 1 || page > inner.list.total_pages || page == inner.list.current_page {
                return Ok(FetchOutcome::Skipped);
            }
            let term = inner.fetched_term.clone();
            inner.dispatch(page, term)
        };
        self.run(request).await
    }

    pub async fn next_page(&self) -> CoreResult<FetchOutcome> {
        let current = self.lock().list.current_page;
        self.set_page(current + 1).await
    }

    pub async fn previous_page(&self) -> CoreResult<FetchOutcome> {
        let current = self.lock().list.current_page;
        if current <= 1 {
            return Ok(FetchOutcome::Skipped);
        }
        self.set_page(current - 1).await
    }

    /// Delete one item, then refetch the current page to resynchronise totals.
    ///
    /// While the call is outstanding the item is reported as pending so its
    /// delete control can be disabled; a second delete of it is skipped.
    pub async fn delete_item(&self, id: &str) -> CoreResult<FetchOutcome> {
        if !self.lock().pending_deletes.insert(id.to_string()) {
            return Ok(FetchOutcome::Skipped);
        }
        self.notify();

        if let Err(source) = self.source.delete_item(id).await {
            let error = match source {
                failure @ CoreError::DeleteFailure { .. } => failure,
                other => CoreError::DeleteFailure {
                    id: id.to_string(),
                    message: other.to_string(),
                },
            };
            log::warn!(target: "dashweb::controller", "{}", error);
            {
                let mut inner = self.lock();
                inner.pending_deletes.remove(id);
                inner.record_error(error.clone());
            }
            self.notify();
            return Err(error);
        }

        log::debug!(target: "dashweb::controller", "deleted {}, refreshing", id);
        let request = {
            let mut inner = self.lock();
            let (page, term) = (inner.list.current_page, inner.fetched_term.clone());
            inner.dispatch(page, term)
        };
        let outcome = self.run(request).await;

        self.lock().pending_deletes.remove(id);
        self.notify();
        outcome
    }

    /// Drive one dispatched fetch (and any clamp re-request) to settlement
    async fn run(&self, mut request: PageRequest) -> CoreResult<FetchOutcome> {
        self.notify();

        loop {
            log::debug!(
                target: "dashweb::controller",
                "fetch #{} page={} term='{}'",
                request.sequence,
                request.page,
                request.term
            );
            let result = self.source.fetch_page(request.page, &request.term).await;
            let settlement = self.lock().settle(&request, result);
            self.notify();

            match settlement {
                Ok(Settlement::Applied) => return Ok(FetchOutcome::Applied),
                Ok(Settlement::Stale) => {
                    log::debug!(
                        target: "dashweb::controller",
                        "discarding stale fetch #{}",
                        request.sequence
                    );
                    return Ok(FetchOutcome::Stale);
                }
                Ok(Settlement::Clamped(next)) => {
                    log::debug!(
                        target: "dashweb::controller",
                        "page {} is past the end, re-requesting page {}",
                        request.page,
                        next.page
                    );
                    // Each clamp targets a strictly lower page, so this terminates
                    request = next;
                }
                Err(error) => {
                    log::warn!(target: "dashweb::controller", "{}", error);
                    return Err(error);
                }
            }
        }
    }

    // ==================== State Access ====================

    pub fn state(&self) -> ListState<T> {
        self.lock().list.clone()
    }

    pub fn query(&self) -> SearchQuery {
        self.lock().query.clone()
    }

    pub fn phase(&self) -> ListPhase {
        self.lock().phase
    }

    pub fn is_delete_pending(&self, id: &str) -> bool {
        self.lock().pending_deletes.contains(id)
    }

    pub fn last_error(&self) -> Option<CoreError> {
        self.lock().last_error.clone()
    }

    /// Clear the error once the presentation layer has shown it
    pub fn dismiss_error(&self) {
        self.lock().last_error = None;
        self.notify();
    }

    pub fn snapshot(&self) -> ListSnapshot<T> {
        let inner = self.lock();
        ListSnapshot {
            phase: inner.phase,
            list: inner.list.clone(),
            query: inner.query.clone(),
            pending_deletes: inner.pending_deletes.iter().cloned().collect(),
            last_error: inner.last_error.as_ref().map(CoreError::to_details),
            errors_recorded: inner.errors_recorded,
        }
    }

    /// Pager window for the current page; `None` when there is at most one page
    pub fn window(&self, max_visible: usize) -> Option<PaginationWindow> {
        let inner = self.lock();
        PaginationWindow::compute(inner.list.current_page, inner.list.total_pages, max_visible)
    }

    /// Receiver bumped after every state change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Cancel a pending debounced search; used when the view goes away
    pub fn shutdown(&self) {
        self.debouncer.shutdown();
    }
}

// ==================== Tests ====================
