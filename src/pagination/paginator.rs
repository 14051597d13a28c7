//! Single-page paginator
//!
//! Fetches exactly one page of a list endpoint and decodes it.

use super::cursor::Cursor;
use super::fetcher::PageFetcher;
use super::types::{PageResult, PaginationKeys};
use crate::error::{Error, Result};
use crate::types::QueryParams;
use tracing::debug;

/// Fetches pages of one list endpoint
#[derive(Debug, Clone)]
pub struct Paginator<F> {
    fetcher: F,
    path: String,
    items_key: String,
    keys: PaginationKeys,
}

impl<F: PageFetcher> Paginator<F> {
    /// Create a paginator for the endpoint at `path` whose records live under `items_key`
    pub fn new(fetcher: F, path: impl Into<String>, items_key: impl Into<String>) -> Self {
        Self {
            fetcher,
            path: path.into(),
            items_key: items_key.into(),
            keys: PaginationKeys::default(),
        }
    }

    /// Override the wire names of the page parameters and metadata object
    #[must_use]
    pub fn with_keys(mut self, keys: PaginationKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key holding the records in each response
    pub fn items_key(&self) -> &str {
        &self.items_key
    }

    /// Wire names in use
    pub fn keys(&self) -> &PaginationKeys {
        &self.keys
    }

    /// Query for one page: caller filters first, then the page keys so they win
    pub fn build_query(&self, page: u32, per_page: u32, params: &QueryParams) -> QueryParams {
        let mut query = params.clone();
        query.insert(self.keys.page_param.clone(), page.to_string());
        query.insert(self.keys.per_page_param.clone(), per_page.to_string());
        query
    }

    /// Fetch page `page` (1-based) with `per_page` records per page
    ///
    /// Performs exactly one request. Fetch and decode failures are returned
    /// unchanged.
    pub async fn paginate(
        &self,
        page: u32,
        per_page: u32,
        params: &QueryParams,
    ) -> Result<PageResult> {
        validate_request(page, per_page)?;

        let query = self.build_query(page, per_page, params);
        debug!(path = %self.path, page, per_page, "Fetching page");

        let response = self.fetcher.fetch_page(&self.path, &query).await?;
        let result = response.into_page(&self.items_key, &self.keys.metadata_key)?;

        debug!(
            path = %self.path,
            page,
            items = result.len(),
            total = result.total(),
            last_page = result.last_page(),
            "Fetched page"
        );

        Ok(result)
    }

    /// Lazily walk every page, starting at page 1
    pub fn into_cursor(self, per_page: u32, params: QueryParams) -> Cursor<F> {
        Cursor::new(self, per_page, params)
    }
}

impl<F: PageFetcher + Clone> Paginator<F> {
    /// A fresh cursor with its own state; earlier cursors are unaffected
    pub fn cursor(&self, per_page: u32, params: QueryParams) -> Cursor<F> {
        self.clone().into_cursor(per_page, params)
    }
}

fn validate_request(page: u32, per_page: u32) -> Result<()> {
    if page == 0 {
        return Err(Error::invalid_page("page numbers start at 1"));
    }
    if per_page == 0 {
        return Err(Error::invalid_page("per_page must be at least 1"));
    }
    Ok(())
}
