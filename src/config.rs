//! Client configuration
//!
//! A [`ClientConfig`] describes how to reach the fleet API: where it lives,
//! how to authenticate, how patiently to retry, and how list endpoints are
//! paged. It loads from a YAML (or JSON) file, from the environment, or both.
//!
//! ```yaml
//! base_url: "https://api.example-fleet.com"
//! auth:
//!   type: api_key
//!   value: "my-key"
//! max_retries: 5
//! backoff:
//!   type: exponential
//!   initial_ms: 200
//! default_page_size: 100
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::{PaginationKeys, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding an API key
pub const ENV_API_KEY: &str = "FLEET_API_KEY";
/// Environment variable holding a bearer access token
pub const ENV_ACCESS_TOKEN: &str = "FLEET_ACCESS_TOKEN";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "FLEET_BASE_URL";
/// Environment variable overriding the default page size
pub const ENV_PAGE_SIZE: &str = "FLEET_PAGE_SIZE";

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the fleet API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication
    #[serde(default)]
    pub auth: AuthConfig,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for retryable failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Client-side rate limit; `null` disables it
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Page size used when the caller does not pick one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    /// Wire names of the pagination parameters
    #[serde(default)]
    pub pagination: PaginationKeys,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth: AuthConfig::None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffConfig::default(),
            rate_limit: default_rate_limit(),
            default_page_size: default_page_size(),
            pagination: PaginationKeys::default(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.example-fleet.com".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}

// ============================================================================
// Loading
// ============================================================================

impl ClientConfig {
    /// Load from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse from a YAML string; JSON is accepted as a YAML subset
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the `FLEET_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Overlay the `FLEET_*` environment variables onto this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`; an API key wins over an access token
    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL).none_if_empty() {
            self.base_url = url;
        }

        if let Some(key) = lookup(ENV_API_KEY).none_if_empty() {
            self.auth = AuthConfig::api_key(key);
        } else if let Some(token) = lookup(ENV_ACCESS_TOKEN).none_if_empty() {
            self.auth = AuthConfig::bearer(token);
        }

        if let Some(size) = lookup(ENV_PAGE_SIZE).none_if_empty() {
            self.default_page_size = size.trim().parse().map_err(|_| {
                Error::invalid_value(ENV_PAGE_SIZE, format!("'{size}' is not a page size"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(Error::invalid_value(
                "default_page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }

        if self.pagination.page_param.is_empty() || self.pagination.per_page_param.is_empty() {
            return Err(Error::invalid_value(
                "pagination",
                "page parameter names must not be empty",
            ));
        }

        match &self.auth {
            AuthConfig::ApiKey { value, .. } if value.trim().is_empty() => {
                Err(Error::missing_field("auth.value"))
            }
            AuthConfig::Bearer { token } if token.trim().is_empty() => {
                Err(Error::missing_field("auth.token"))
            }
            _ => Ok(()),
        }
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            )
            .header("Accept", "application/json");

        let builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };
        builder.build()
    }
}
