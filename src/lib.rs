// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # fleet-sdk
//!
//! Async client for a fleet-management REST API: vehicles, drivers,
//! hours-of-service logs, dispatches, documents and the rest of its paged
//! list endpoints.
//!
//! ## Features
//!
//! - **Page-number pagination**: fetch one page with its metadata, or walk
//!   every page lazily with a memory-bounded cursor
//! - **Auth**: API key (header or query), bearer token, OAuth2 refresh-token flow
//! - **Resilient HTTP**: retries with backoff, `Retry-After`, client-side rate limiting
//! - **Test doubles**: an in-memory fetcher that records every request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fleet_sdk::{resources, ClientConfig, FleetClient, QueryParams, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = FleetClient::new(ClientConfig::from_env()?)?;
//!
//!     // One page, with metadata
//!     let page = client
//!         .paginate(&resources::VEHICLES, 1, 100, &QueryParams::new())
//!         .await?;
//!     println!("{} vehicles over {} pages", page.total(), page.last_page());
//!
//!     // Every record, one page in memory at a time
//!     let mut cursor = client.cursor(&resources::USERS, 100, QueryParams::new());
//!     while let Some(user) = cursor.try_next().await? {
//!         println!("{user}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        FleetClient                         │
//! │   paginate(resource, page, per_page)   cursor(resource)    │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬────────────────────┐
//! │  Pagination  │          HTTP          │        Auth        │
//! ├──────────────┼────────────────────────┼────────────────────┤
//! │ Paginator    │ Retry + backoff        │ API key            │
//! │ Cursor       │ Rate limit             │ Bearer             │
//! │ PageFetcher  │ JSON decode            │ OAuth2 refresh     │
//! └──────────────┴────────────────────────┴────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document the resource constants and PageResult accessors

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Page-number pagination and lazy cursors
pub mod pagination;

/// List endpoints of the fleet API
pub mod resources;

/// Client configuration
pub mod config;

/// The fleet API client
pub mod client;

/// In-memory fetcher for tests
pub mod testing;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::FleetClient;
pub use config::ClientConfig;
pub use pagination::{Cursor, PageFetcher, PageMetadata, PageResult, Paginator};
pub use resources::Resource;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
