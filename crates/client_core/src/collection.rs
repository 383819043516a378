//! State machine behind every incrementally-loaded list (animals, ONGs).
//!
//! One controller owns one scrollable collection. Fetches are serialized by
//! the `loading` flag, filter changes open a new epoch, and responses from a
//! previous epoch are discarded on arrival instead of being cancelled.

use async_trait::async_trait;
use shared::page::{Page, Query};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::ClientError;

/// One "filter generation" of a collection. A reset adopts a fresh epoch;
/// an in-flight fetch that resolves under an older epoch is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Epoch(u64);

/// Injected list-fetch seam, `GET <resource>?<urlencoded query>` behind it.
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    async fn fetch_page(&self, query: &Query) -> Result<Page<T>, ClientError>;
}

/// What a `load_next` call actually did, so callers and tests can tell the
/// guards apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Appended { count: usize, has_more: bool },
    /// A fetch was already in flight.
    SkippedBusy,
    /// The last page was already loaded.
    SkippedExhausted,
    /// The current scroll session already triggered a load.
    SkippedGate,
    /// The response belonged to an epoch that a reset has since retired.
    StaleDiscarded,
}

/// UI-observable view of the collection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub loading: bool,
    pub has_more: bool,
}

struct CollectionState<T> {
    query: Query,
    items: Vec<T>,
    page: u32,
    loading: bool,
    has_more: bool,
    epoch: Epoch,
    epoch_counter: u64,
    scroll_session_consumed: bool,
}

pub struct PaginatedCollectionController<T> {
    inner: Mutex<CollectionState<T>>,
}

impl<T: Clone + Send> PaginatedCollectionController<T> {
    /// Starts a fresh collection for `query`'s filter portion; paging always
    /// begins at 1 regardless of any `page` carried by the query.
    pub fn new(query: Query) -> Self {
        Self {
            inner: Mutex::new(CollectionState {
                query,
                items: Vec::new(),
                page: 1,
                loading: false,
                has_more: true,
                epoch: Epoch(0),
                epoch_counter: 0,
                scroll_session_consumed: false,
            }),
        }
    }

    /// Clears the collection and adopts a new epoch. Any fetch still in
    /// flight is logically invalidated: its response will no longer match
    /// the current epoch and gets dropped on arrival.
    pub async fn reset(&self, query: Query) {
        let mut state = self.inner.lock().await;
        state.epoch_counter += 1;
        state.epoch = Epoch(state.epoch_counter);
        state.query = query;
        state.items.clear();
        state.page = 1;
        state.loading = false;
        state.has_more = true;
        state.scroll_session_consumed = false;
        info!(epoch = state.epoch_counter, "collection reset");
    }

    /// Adopts `query` only if its filter portion differs from the active
    /// one; a query that differs solely by `page` never resets. Returns
    /// whether a reset happened.
    pub async fn apply_query(&self, query: Query) -> bool {
        {
            let state = self.inner.lock().await;
            if state.query.filter_fingerprint() == query.filter_fingerprint() {
                return false;
            }
        }
        self.reset(query).await;
        true
    }

    /// Requests the next page. No-op while a fetch is in flight or after
    /// the last page, so at most one fetch per controller is ever active
    /// and pages are applied in strictly increasing order within an epoch.
    pub async fn load_next(&self, fetcher: &dyn PageFetcher<T>) -> Result<LoadOutcome, ClientError> {
        let (query, epoch) = {
            let mut state = self.inner.lock().await;
            if state.loading {
                return Ok(LoadOutcome::SkippedBusy);
            }
            if !state.has_more {
                return Ok(LoadOutcome::SkippedExhausted);
            }
            state.loading = true;
            (state.query.clone().with_page(state.page), state.epoch)
        };

        let fetched = fetcher.fetch_page(&query).await;

        let mut state = self.inner.lock().await;
        if state.epoch != epoch {
            // A reset happened mid-flight and already released `loading`;
            // this response belongs to a retired epoch.
            info!(requested_page = query.page, "stale page response discarded");
            return Ok(LoadOutcome::StaleDiscarded);
        }

        state.loading = false;
        let page = fetched?;
        let count = page.data.len();
        state.items.extend(page.data);
        state.has_more = page.meta.has_next_page;
        state.page += 1;
        debug!(
            page = state.page - 1,
            appended = count,
            has_more = state.has_more,
            "page applied"
        );
        Ok(LoadOutcome::Appended {
            count,
            has_more: state.has_more,
        })
    }

    /// Signal from the UI layer that a new continuous scroll gesture began;
    /// re-arms the end-reached gate.
    pub async fn begin_scroll_session(&self) {
        self.inner.lock().await.scroll_session_consumed = false;
    }

    /// End-reached adapter for momentum scrolling: the first call of a
    /// scroll session forwards to [`Self::load_next`], repeats within the
    /// same gesture are swallowed.
    pub async fn end_reached(
        &self,
        fetcher: &dyn PageFetcher<T>,
    ) -> Result<LoadOutcome, ClientError> {
        {
            let mut state = self.inner.lock().await;
            if state.scroll_session_consumed {
                return Ok(LoadOutcome::SkippedGate);
            }
            state.scroll_session_consumed = true;
        }
        self.load_next(fetcher).await
    }

    pub async fn snapshot(&self) -> CollectionSnapshot<T> {
        let state = self.inner.lock().await;
        CollectionSnapshot {
            items: state.items.clone(),
            page: state.page,
            loading: state.loading,
            has_more: state.has_more,
        }
    }

    pub async fn active_query(&self) -> Query {
        self.inner.lock().await.query.clone()
    }

    pub async fn epoch(&self) -> Epoch {
        self.inner.lock().await.epoch
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
