//! Pagination value types
//!
//! `PageMetadata` and `PageResult` are the typed shapes a list response is
//! decoded into. Nothing past the decode boundary looks at raw JSON maps.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page size the fleet API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Wire names used by a paged list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationKeys {
    /// Query parameter carrying the 1-based page number
    pub page_param: String,
    /// Query parameter carrying the page size
    pub per_page_param: String,
    /// Dot path of the metadata object in the response body ("" = root)
    pub metadata_key: String,
}

impl Default for PaginationKeys {
    fn default() -> Self {
        Self {
            page_param: "page_no".to_string(),
            per_page_param: "per_page".to_string(),
            metadata_key: "pagination".to_string(),
        }
    }
}

/// Pagination metadata reported by the server for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMetadata")]
pub struct PageMetadata {
    /// Total item count across all pages
    total: u64,
    /// Page size used for the request
    per_page: u32,
    /// 1-based number of this page
    current_page: u32,
}

/// Metadata exactly as it appears on the wire
#[derive(Debug, Deserialize)]
struct RawMetadata {
    total: u64,
    per_page: u32,
    #[serde(alias = "page_no")]
    current_page: u32,
}

impl TryFrom<RawMetadata> for PageMetadata {
    type Error = Error;

    fn try_from(raw: RawMetadata) -> Result<Self> {
        Self::new(raw.total, raw.per_page, raw.current_page)
    }
}

impl PageMetadata {
    /// Build metadata, rejecting values that would make the page math meaningless
    pub fn new(total: u64, per_page: u32, current_page: u32) -> Result<Self> {
        if per_page == 0 {
            return Err(Error::decode("pagination per_page must be positive"));
        }
        if current_page == 0 {
            return Err(Error::decode("pagination current_page must be positive"));
        }
        Ok(Self {
            total,
            per_page,
            current_page,
        })
    }

    /// Total item count across all pages
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Page size used for the request
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// 1-based number of this page
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Number of the last page; an empty collection still has one page
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(u64::from(self.per_page)).max(1)
    }

    /// Whether a page after this one exists
    pub fn has_more_pages(&self) -> bool {
        u64::from(self.current_page) < self.last_page()
    }
}

/// One fetched page: raw records in server order plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    items: Vec<Value>,
    metadata: PageMetadata,
}

impl PageResult {
    /// Create a page result
    pub fn new(items: Vec<Value>, metadata: PageMetadata) -> Self {
        Self { items, metadata }
    }

    /// Records on this page
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Take ownership of the records
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    /// The page metadata
    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    pub fn total(&self) -> u64 {
        self.metadata.total()
    }

    pub fn per_page(&self) -> u32 {
        self.metadata.per_page()
    }

    pub fn current_page(&self) -> u32 {
        self.metadata.current_page()
    }

    pub fn last_page(&self) -> u64 {
        self.metadata.last_page()
    }

    pub fn has_more_pages(&self) -> bool {
        self.metadata.has_more_pages()
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page has no records
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for PageResult {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a PageResult {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
