//! Fleet API client
//!
//! [`FleetClient`] ties the HTTP transport to the pagination layer. Each list
//! endpoint is addressed by a [`Resource`]; the client builds a paginator for
//! it on demand, so every cursor it hands out starts fresh from page 1.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::pagination::{Cursor, PageResult, PaginationKeys, Paginator, DEFAULT_PAGE_SIZE};
use crate::resources::Resource;
use crate::types::QueryParams;
use tracing::debug;

/// Entry point to the fleet API
#[derive(Debug)]
pub struct FleetClient {
    http: HttpClient,
    keys: PaginationKeys,
    default_page_size: u32,
}

impl FleetClient {
    /// Build a client from configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        debug!(
            base_url = %config.base_url,
            auth = config.auth.kind(),
            page_size = config.default_page_size,
            "Creating fleet client"
        );

        let http = HttpClient::with_auth(config.http_config(), config.auth.clone())?;
        Ok(Self {
            http,
            keys: config.pagination,
            default_page_size: config.default_page_size,
        })
    }

    /// Wrap an existing HTTP client using the default wire names and page size
    pub fn from_http(http: HttpClient) -> Self {
        Self {
            http,
            keys: PaginationKeys::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Override the pagination wire names
    #[must_use]
    pub fn with_keys(mut self, keys: PaginationKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Override the page size used by [`FleetClient::cursor_default`]
    #[must_use]
    pub fn with_default_page_size(mut self, per_page: u32) -> Self {
        self.default_page_size = per_page;
        self
    }

    /// The underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Page size used when none is given
    pub fn default_page_size(&self) -> u32 {
        self.default_page_size
    }

    /// Single-page paginator for `resource`
    pub fn paginator(&self, resource: &Resource) -> Paginator<&HttpClient> {
        Paginator::new(&self.http, resource.path, resource.items_key).with_keys(self.keys.clone())
    }

    /// Fetch one page of `resource`
    pub async fn paginate(
        &self,
        resource: &Resource,
        page: u32,
        per_page: u32,
        params: &QueryParams,
    ) -> Result<PageResult> {
        self.paginator(resource).paginate(page, per_page, params).await
    }

    /// Lazily walk every record of `resource`
    pub fn cursor(
        &self,
        resource: &Resource,
        per_page: u32,
        params: QueryParams,
    ) -> Cursor<&HttpClient> {
        self.paginator(resource).into_cursor(per_page, params)
    }

    /// [`FleetClient::cursor`] with the configured default page size
    pub fn cursor_default(&self, resource: &Resource, params: QueryParams) -> Cursor<&HttpClient> {
        self.cursor(resource, self.default_page_size, params)
    }
}
