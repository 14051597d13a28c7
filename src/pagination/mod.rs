//! Pagination module
//!
//! Page-number pagination over the fleet API's list endpoints.
//!
//! # Overview
//!
//! Every list endpoint takes a 1-based page number and a page size, and
//! returns one page of records next to a metadata object carrying `total`,
//! `per_page` and `current_page`.
//!
//! - [`Paginator`] fetches exactly one page and decodes it into a [`PageResult`]
//! - [`Cursor`] walks every page lazily, one request per page
//! - [`PageFetcher`] is the seam to the transport; [`crate::http::HttpClient`]
//!   implements it, and so does [`crate::testing::FakeFetcher`]

mod cursor;
mod fetcher;
mod paginator;
mod types;

pub use cursor::Cursor;
pub use fetcher::{PageFetcher, RawResponse};
pub use paginator::Paginator;
pub use types::{PageMetadata, PageResult, PaginationKeys, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[cfg(test)]
mod tests;
