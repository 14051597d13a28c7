//! Lazy multi-page cursor
//!
//! A `Cursor` presents a paged collection as one forward-only sequence of
//! records. Pages are fetched one at a time, only when the buffered records of
//! the previous page have all been handed out, so at most one page is held in
//! memory and abandoning the cursor stops all further requests.
//!
//! ```rust,ignore
//! let mut cursor = client.cursor(&resources::VEHICLES, 100, QueryParams::new());
//! while let Some(vehicle) = cursor.try_next().await? {
//!     println!("{vehicle}");
//! }
//! ```

use super::fetcher::PageFetcher;
use super::paginator::Paginator;
use crate::error::{Error, Result};
use crate::types::QueryParams;
use futures::Stream;
use serde_json::Value;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Iteration state, created on the first pull
#[derive(Debug)]
struct CursorState {
    /// Page to request on the next refill
    page: u32,
    /// Records of the last fetched page not yet handed out
    buffer: VecDeque<Value>,
    /// No further pages will be requested once set
    exhausted: bool,
    /// The server reported a page after `u32::MAX`
    overflowed: bool,
}

impl CursorState {
    fn new(page: u32) -> Self {
        Self {
            page,
            buffer: VecDeque::new(),
            exhausted: false,
            overflowed: false,
        }
    }
}

/// Forward-only sequence over every record of a paged endpoint
#[derive(Debug)]
pub struct Cursor<F> {
    paginator: Paginator<F>,
    per_page: u32,
    params: QueryParams,
    state: Option<CursorState>,
    start_page: u32,
    pages_fetched: u32,
}

impl<F: PageFetcher> Cursor<F> {
    /// Create a cursor; no request is made until the first pull
    pub fn new(paginator: Paginator<F>, per_page: u32, params: QueryParams) -> Self {
        Self {
            paginator,
            per_page,
            params,
            state: None,
            start_page: 1,
            pages_fetched: 0,
        }
    }

    /// Resume from `page` instead of page 1; ignored once iteration has started
    #[must_use]
    pub fn starting_at(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }

    /// Pull the next record, fetching the next page if the buffer is empty
    ///
    /// Returns `Ok(None)` once the collection is exhausted. A failed fetch
    /// leaves the cursor untouched, so calling again retries the same page.
    pub async fn try_next(&mut self) -> Result<Option<Value>> {
        let start_page = self.start_page;
        let state = self
            .state
            .get_or_insert_with(|| CursorState::new(start_page));

        loop {
            if let Some(item) = state.buffer.pop_front() {
                return Ok(Some(item));
            }
            if state.exhausted {
                return Ok(None);
            }
            if state.overflowed {
                return Err(Error::pagination(
                    self.paginator.path(),
                    "page number overflow",
                ));
            }

            let requested = state.page;
            let page = self
                .paginator
                .paginate(requested, self.per_page, &self.params)
                .await?;
            self.pages_fetched = self.pages_fetched.saturating_add(1);

            if page.current_page() != requested {
                warn!(
                    path = %self.paginator.path(),
                    requested,
                    reported = page.current_page(),
                    "Server reported a different page number than requested"
                );
            }

            let last = page.is_empty() || !page.has_more_pages();
            if last {
                debug!(path = %self.paginator.path(), page = requested, "Reached last page");
                state.exhausted = true;
            } else if let Some(next) = requested.checked_add(1) {
                state.page = next;
            } else {
                // Items of the final addressable page are still handed out
                warn!(path = %self.paginator.path(), "Page number overflow");
                state.overflowed = true;
            }

            state.buffer.extend(page.into_items());
        }
    }

    /// Drain every remaining record into a vector
    pub async fn try_collect(mut self) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next().await? {
            items.push(item);
        }
        Ok(items)
    }

    /// Adapt into a `Stream`; the stream ends after yielding the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<Value>> {
        futures::stream::try_unfold(self, |mut cursor| async move {
            let next = cursor.try_next().await?;
            Ok::<_, Error>(next.map(|item| (item, cursor)))
        })
    }

    /// Number of page requests that have succeeded so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Whether the last page has been fetched; buffered records may remain
    pub fn is_exhausted(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.exhausted)
    }

    /// Whether the first pull has happened
    pub fn is_started(&self) -> bool {
        self.state.is_some()
    }

    /// Records fetched but not yet handed out
    pub fn buffered(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.buffer.len())
    }

    /// Page size requested for each page
    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}
