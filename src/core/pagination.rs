//! # Pagination
//!
//! Accumulates pages of items fetched through an injected [`PageSource`].
//!
//! The state machine is split into two halves so it can be driven directly
//! (`paginator.load_more().await`) or from an event loop that runs the fetch
//! in a background task and feeds the result back later:
//!
//! ```text
//! begin_load_more() ──► PageRequest ──► PageSource::fetch_page() ──► complete()
//! begin_refresh()   ──┘
//! ```
//!
//! A short page (fewer than `page_size` items, including zero) is the only
//! exhaustion signal. A source whose last page is exactly full costs one
//! extra fetch that has to come back empty before `has_more` turns false.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use log::{debug, info, warn};

// ============================================================================
// Errors
// ============================================================================

/// A failed page fetch. The only error the paginator knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Normalizes any error raised by a page source.
    pub fn from_error(err: &dyn std::error::Error) -> Self {
        Self::new(err.to_string())
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch failed: {}", self.message)
    }
}

impl std::error::Error for FetchError {}

// ============================================================================
// Page Sources
// ============================================================================

/// Supplies pages of items by 1-based page number.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<T>, FetchError>;
}

/// Adapts a closure returning a boxed future into a [`PageSource`].
pub struct FnPageSource<F> {
    fetch: F,
}

impl<F> FnPageSource<F> {
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

#[async_trait]
impl<T, F> PageSource<T> for FnPageSource<F>
where
    T: Send + 'static,
    F: Fn(u32) -> BoxFuture<'static, Result<Vec<T>, FetchError>> + Send + Sync,
{
    async fn fetch_page(&self, page: u32) -> Result<Vec<T>, FetchError> {
        (self.fetch)(page).await
    }
}

/// Serves pages out of an in-memory vector, optionally after a fixed delay.
pub struct VecPageSource<T> {
    items: Vec<T>,
    page_size: usize,
    latency: Option<Duration>,
}

impl<T> VecPageSource<T> {
    pub fn new(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size: page_size.max(1),
            latency: None,
        }
    }

    /// Simulates a slow backend by sleeping before every page.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = (!latency.is_zero()).then_some(latency);
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl<T> PageSource<T> for VecPageSource<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn fetch_page(&self, page: u32) -> Result<Vec<T>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if page == 0 {
            return Err(FetchError::new("page numbers start at 1"));
        }

        let start = (page as usize - 1).saturating_mul(self.page_size);
        if start >= self.items.len() {
            return Ok(Vec::new());
        }
        let end = (start + self.page_size).min(self.items.len());
        Ok(self.items[start..end].to_vec())
    }
}

// ============================================================================
// State
// ============================================================================

/// Whether a settled fetch extends the list or replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// `load_more`: append the page.
    Append,
    /// `refresh`: the page becomes the whole list.
    Replace,
}

/// A fetch the paginator has committed to. Handed back to [`Paginator::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub kind: FetchKind,
}

/// Observable pagination state. Only [`Paginator`] mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub last_error: Option<FetchError>,
    pub has_more: bool,
    /// Last successfully fetched page. Starts at 1: the initial data counts as page 1.
    pub current_page: u32,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> PaginationState<T> {
    fn initial(items: Vec<T>, page_size: usize) -> Self {
        let total_items = items.len();
        Self {
            items,
            is_loading: false,
            last_error: None,
            has_more: true,
            current_page: 1,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        }
    }

    fn recount(&mut self, page_size: usize) {
        self.total_items = self.items.len();
        self.total_pages = self.total_items.div_ceil(page_size);
    }
}

/// Called once per failed fetch.
pub type ErrorObserver = Box<dyn Fn(&FetchError) + Send + Sync>;

// ============================================================================
// Paginator
// ============================================================================

pub struct Paginator<T> {
    state: PaginationState<T>,
    initial_data: Vec<T>,
    page_size: usize,
    source: Option<Arc<dyn PageSource<T>>>,
    on_error: Option<ErrorObserver>,
}

impl<T: Clone> Paginator<T> {
    /// Creates a paginator holding `initial_data`. A `page_size` of 0 is treated as 1.
    pub fn new(page_size: usize, initial_data: Vec<T>) -> Self {
        let page_size = if page_size == 0 {
            warn!("Paginator created with page_size 0, using 1");
            1
        } else {
            page_size
        };

        Self {
            state: PaginationState::initial(initial_data.clone(), page_size),
            initial_data,
            page_size,
            source: None,
            on_error: None,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn PageSource<T>>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_error_observer(
        mut self,
        observer: impl Fn(&FetchError) + Send + Sync + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &PaginationState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        &self.state.items
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The configured source, for callers that run fetches themselves.
    pub fn source(&self) -> Option<Arc<dyn PageSource<T>>> {
        self.source.clone()
    }

    /// Starts fetching the next page.
    ///
    /// Returns `None` (and changes nothing) while a fetch is in flight, once
    /// the list is exhausted, or when no source is configured.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if self.state.is_loading || !self.state.has_more || self.source.is_none() {
            return None;
        }

        let request = PageRequest {
            page: self.state.current_page + 1,
            kind: FetchKind::Append,
        };
        self.state.is_loading = true;
        self.state.last_error = None;
        debug!("Loading page {}", request.page);
        Some(request)
    }

    /// Starts re-fetching page 1. Prior items stay visible until it settles.
    pub fn begin_refresh(&mut self) -> Option<PageRequest> {
        if self.state.is_loading || self.source.is_none() {
            return None;
        }

        self.state.is_loading = true;
        self.state.last_error = None;
        self.state.current_page = 1;
        self.state.has_more = true;
        debug!("Refreshing from page 1");
        Some(PageRequest {
            page: 1,
            kind: FetchKind::Replace,
        })
    }

    /// Applies the outcome of a fetch started by `begin_load_more` or `begin_refresh`.
    ///
    /// Returns the index the new items start at, or `None` when the list was replaced.
    pub fn complete(&mut self, request: PageRequest, result: Result<Vec<T>, FetchError>) -> Option<usize> {
        self.state.is_loading = false;
        let start = self.state.items.len();

        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!("Page {} failed: {}", request.page, err);
                if let Some(observer) = &self.on_error {
                    observer(&err);
                }
                self.state.last_error = Some(err);
                return Some(start);
            }
        };

        let received = page.len();
        let appended = match request.kind {
            FetchKind::Append if page.is_empty() => {
                info!("Page {} came back empty, list exhausted", request.page);
                self.state.has_more = false;
                Some(start)
            }
            FetchKind::Append => {
                self.state.items.extend(page);
                self.state.current_page += 1;
                self.state.has_more = received == self.page_size;
                self.state.recount(self.page_size);
                Some(start)
            }
            FetchKind::Replace => {
                self.state.items = page;
                self.state.current_page = 1;
                self.state.has_more = received == self.page_size;
                self.state.recount(self.page_size);
                None
            }
        };

        info!(
            "Page {} settled: {} items received, {} total, has_more={}",
            request.page, received, self.state.total_items, self.state.has_more
        );
        appended
    }

    /// Fetches and appends the next page. Failures end up in `last_error`, never in the return.
    pub async fn load_more(&mut self) {
        let Some(request) = self.begin_load_more() else {
            return;
        };
        self.run(request).await;
    }

    /// Fetches page 1 and replaces the list with it.
    pub async fn refresh(&mut self) {
        let Some(request) = self.begin_refresh() else {
            return;
        };
        self.run(request).await;
    }

    async fn run(&mut self, request: PageRequest) {
        let result = match self.source.clone() {
            Some(source) => source.fetch_page(request.page).await,
            None => Err(FetchError::new("no page source configured")),
        };
        self.complete(request, result);
    }

    /// Restores the state the paginator was created with. No fetch.
    pub fn reset(&mut self) {
        self.state = PaginationState::initial(self.initial_data.clone(), self.page_size);
    }

    /// Replaces the items from outside. `has_more` is a guess here, since no fetch happened.
    pub fn set_data(&mut self, items: Vec<T>) {
        self.state.has_more = items.len() >= self.page_size;
        self.state.items = items;
        self.state.recount(self.page_size);
    }
}
