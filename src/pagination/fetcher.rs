//! Page fetching contract
//!
//! A `PageFetcher` performs one GET for one page. `RawResponse` is the decode
//! boundary: it turns the JSON body into a typed `PageResult` or fails.

use super::types::{PageMetadata, PageResult};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::QueryParams;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Performs a single page request
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `path` with `query` and return the decoded body
    async fn fetch_page(&self, path: &str, query: &QueryParams) -> Result<RawResponse>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    async fn fetch_page(&self, path: &str, query: &QueryParams) -> Result<RawResponse> {
        (**self).fetch_page(path, query).await
    }
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch_page(&self, path: &str, query: &QueryParams) -> Result<RawResponse> {
        (**self).fetch_page(path, query).await
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, path: &str, query: &QueryParams) -> Result<RawResponse> {
        let body: Value = self
            .get_json_with_config(path, RequestConfig::new().queries(query))
            .await?;
        Ok(RawResponse::new(body))
    }
}

/// Decoded JSON body of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    body: Value,
}

impl RawResponse {
    /// Wrap a decoded body
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    /// Records under `key`; missing or non-array values are decode failures
    pub fn items(&self, key: &str) -> Result<Vec<Value>> {
        take_items(lookup(&self.body, key).cloned(), key)
    }

    /// Pagination metadata under `key`
    pub fn metadata(&self, key: &str) -> Result<PageMetadata> {
        let raw = lookup(&self.body, key).ok_or_else(|| {
            Error::decode(format!("response has no '{key}' pagination metadata"))
        })?;

        PageMetadata::deserialize(raw)
            .map_err(|e| Error::decode(format!("malformed pagination metadata at '{key}': {e}")))
    }

    /// Consume the body into a page result without copying the records
    pub fn into_page(mut self, items_key: &str, metadata_key: &str) -> Result<PageResult> {
        let metadata = self.metadata(metadata_key)?;
        let raw = lookup_mut(&mut self.body, items_key).map(Value::take);
        let items = take_items(raw, items_key)?;
        Ok(PageResult::new(items, metadata))
    }
}

fn take_items(raw: Option<Value>, key: &str) -> Result<Vec<Value>> {
    match raw {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(not_an_array(key, &other)),
        None => Err(Error::decode(format!("response has no '{key}' field"))),
    }
}

fn not_an_array(key: &str, value: &Value) -> Error {
    Error::decode(format!(
        "expected an array at '{key}', found {}",
        json_type_name(value)
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Resolve a dot path such as `data.vehicles`; the empty path is the root
fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, part| current.get(part))
}

fn lookup_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.')
        .try_fold(value, |current, part| current.get_mut(part))
}
