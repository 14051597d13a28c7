//! In-memory page fetcher for tests
//!
//! `FakeFetcher` serves a fixed collection the way the fleet API does: it
//! reads the page parameters from the query, slices the collection, and
//! wraps the slice with pagination metadata. Every call is recorded so tests
//! can assert how many requests a cursor made and with which parameters.

use crate::error::{Error, Result};
use crate::pagination::{PageFetcher, PaginationKeys, RawResponse};
use crate::types::QueryParams;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// A recorded request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    /// Requested path
    pub path: String,
    /// Full query sent with the request
    pub query: QueryParams,
}

/// Fake list endpoint backed by an in-memory collection
#[derive(Debug)]
pub struct FakeFetcher {
    items: Vec<Value>,
    items_key: String,
    keys: PaginationKeys,
    pages: Option<Vec<Vec<Value>>>,
    total_override: Option<u64>,
    failures: Mutex<HashMap<u32, u32>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl FakeFetcher {
    /// Serve `items` under `items_key`
    pub fn new(items: Vec<Value>, items_key: impl Into<String>) -> Self {
        Self {
            items,
            items_key: items_key.into(),
            keys: PaginationKeys::default(),
            pages: None,
            total_override: None,
            failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Serve `total` records of the form `{"id": n}`, numbered from 1
    pub fn numbered(total: u64, items_key: impl Into<String>) -> Self {
        let items = (1..=total).map(|id| json!({ "id": id })).collect();
        Self::new(items, items_key)
    }

    /// Serve explicit page bodies: page `n` returns `pages[n - 1]` and any
    /// later page is empty. `total` is reported unchanged on every page.
    pub fn with_pages(pages: Vec<Vec<Value>>, total: u64, items_key: impl Into<String>) -> Self {
        let mut fetcher = Self::new(Vec::new(), items_key);
        fetcher.pages = Some(pages);
        fetcher.total_override = Some(total);
        fetcher
    }

    /// Use non-default wire names
    #[must_use]
    pub fn with_keys(mut self, keys: PaginationKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Fail the next `times` requests for `page` with a 503
    #[must_use]
    pub fn fail_on_page(self, page: u32, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page, times);
        self
    }

    /// Every request made so far, in order
    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests made so far, failed ones included
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Page numbers requested so far, in order
    pub fn requested_pages(&self) -> Vec<u32> {
        self.calls()
            .iter()
            .filter_map(|call| call.query.get(&self.keys.page_param)?.parse().ok())
            .collect()
    }

    fn take_failure(&self, page: u32) -> bool {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        match failures.get_mut(&page) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    fn page_items(&self, page: u32, per_page: u32) -> Vec<Value> {
        let index = (page - 1) as usize;
        match &self.pages {
            Some(pages) => pages.get(index).cloned().unwrap_or_default(),
            None => {
                let per_page = per_page as usize;
                self.items
                    .iter()
                    .skip(index.saturating_mul(per_page))
                    .take(per_page)
                    .cloned()
                    .collect()
            }
        }
    }

    fn total(&self) -> u64 {
        self.total_override.unwrap_or(self.items.len() as u64)
    }

    fn body(&self, items: Vec<Value>, page: u32, per_page: u32) -> Value {
        let metadata = json!({
            "total": self.total(),
            "per_page": per_page,
            "current_page": page,
        });

        let mut body = serde_json::Map::new();
        body.insert(self.items_key.clone(), Value::Array(items));
        if self.keys.metadata_key.is_empty() {
            if let Value::Object(fields) = metadata {
                body.extend(fields);
            }
        } else {
            body.insert(self.keys.metadata_key.clone(), metadata);
        }
        Value::Object(body)
    }
}

fn param(query: &QueryParams, name: &str) -> Result<u32> {
    query
        .get(name)
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::http_status(400, format!("missing or invalid '{name}' parameter")))
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(&self, path: &str, query: &QueryParams) -> Result<RawResponse> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(FetchCall {
                path: path.to_string(),
                query: query.clone(),
            });

        let page = param(query, &self.keys.page_param)?;
        let per_page = param(query, &self.keys.per_page_param)?;

        if self.take_failure(page) {
            return Err(Error::http_status(503, "service unavailable"));
        }

        let items = self.page_items(page, per_page);
        Ok(RawResponse::new(self.body(items, page, per_page)))
    }
}
