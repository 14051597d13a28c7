//! Authenticator implementation
//!
//! Handles applying authentication to requests and managing token refresh.

use super::types::{
    AuthConfig, CachedToken, Location, DEFAULT_API_KEY_HEADER, DEFAULT_API_KEY_PARAM,
};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Mutable OAuth2 state shared by every request using this authenticator
#[derive(Debug, Default)]
struct TokenState {
    /// Current access token
    access: Option<CachedToken>,
    /// Refresh token, replaced when the server rotates it
    refresh_token: Option<String>,
}

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Token cache for OAuth2
    state: Arc<RwLock<TokenState>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        let state = match &config {
            AuthConfig::OAuth2 {
                refresh_token,
                access_token,
                expires_at,
                ..
            } => TokenState {
                access: access_token
                    .clone()
                    .map(|token| CachedToken::new(token, *expires_at)),
                refresh_token: Some(refresh_token.clone()),
            },
            _ => TokenState::default(),
        };

        Self {
            config,
            state: Arc::new(RwLock::new(state)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),

            AuthConfig::ApiKey {
                location,
                name,
                value,
            } => match location {
                Location::Header => {
                    let header = name.as_deref().unwrap_or(DEFAULT_API_KEY_HEADER);
                    Ok(req.header(header, value.as_str()))
                }
                Location::Query => {
                    let param = name.as_deref().unwrap_or(DEFAULT_API_KEY_PARAM);
                    Ok(req.query(&[(param, value.as_str())]))
                }
            },

            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),

            AuthConfig::OAuth2 { .. } => {
                let token = self.get_or_refresh_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let state = self.state.read().await;
            if let Some(token) = state.access.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut state = self.state.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = state.access.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let refresh_token = state
            .refresh_token
            .clone()
            .ok_or_else(|| Error::auth("No refresh token available"))?;

        let response = self.fetch_oauth2_refresh(&refresh_token).await?;
        if let Some(rotated) = response.refresh_token.clone() {
            state.refresh_token = Some(rotated);
        }

        let token = response.into_cached_token();
        let token_str = token.token.clone();
        state.access = Some(token);

        Ok(token_str)
    }

    /// Exchange the refresh token for a new access token
    async fn fetch_oauth2_refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let AuthConfig::OAuth2 {
            token_url,
            client_id,
            client_secret,
            ..
        } = &self.config
        else {
            return Err(Error::auth(
                "Token refresh not supported for this auth type",
            ));
        };

        debug!("Refreshing OAuth2 access token at {token_url}");

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http_client
            .post(token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRefresh {
                message: format!("Refresh token request failed with status {status}: {body}"),
            });
        }

        response.json().await.map_err(Error::Http)
    }

    /// Clear the cached access token, forcing a refresh on next use
    pub async fn clear_cache(&self) {
        let mut state = self.state.write().await;
        state.access = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("kind", &self.config.kind())
            .finish_non_exhaustive()
    }
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}
