//! Auth configuration types
//!
//! These types describe how requests to the fleet API are authenticated.
//! They deserialize straight from the client config file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default header carrying an API key
pub const DEFAULT_API_KEY_HEADER: &str = "X-Api-Key";

/// Default query parameter carrying an API key
pub const DEFAULT_API_KEY_PARAM: &str = "api_key";

/// Seconds before expiry at which a token is treated as stale
const EXPIRY_BUFFER_SECS: i64 = 30;

/// Location for API key placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Place in HTTP header
    #[default]
    Header,
    /// Place in query parameter
    Query,
}

/// Authentication configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// API key authentication (header or query)
    ApiKey {
        /// Where to place the API key
        #[serde(default)]
        location: Location,
        /// Header or query parameter name, defaults depend on location
        #[serde(default)]
        name: Option<String>,
        /// The API key value
        value: String,
    },

    /// Static bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// OAuth2 access token kept fresh with the refresh-token grant
    #[serde(rename = "oauth2")]
    OAuth2 {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
        /// Access token to use until it expires
        #[serde(default)]
        access_token: Option<String>,
        /// Expiry of `access_token`, if known
        #[serde(default)]
        expires_at: Option<DateTime<Utc>>,
    },
}

impl AuthConfig {
    /// API key sent in the default `X-Api-Key` header
    pub fn api_key(value: impl Into<String>) -> Self {
        Self::ApiKey {
            location: Location::Header,
            name: None,
            value: value.into(),
        }
    }

    /// Static bearer token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Short label for logs, never includes secrets
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ApiKey { .. } => "api_key",
            Self::Bearer { .. } => "bearer",
            Self::OAuth2 { .. } => "oauth2",
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(EXPIRY_BUFFER_SECS);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
