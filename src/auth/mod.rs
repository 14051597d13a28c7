//! Authentication module
//!
//! Supports: API Key (header or query), static Bearer token, OAuth2 refresh-token flow
//!
//! The `Authenticator` handles all auth types and caches the OAuth2 access
//! token until it is about to expire.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::{AuthConfig, CachedToken, Location, DEFAULT_API_KEY_HEADER};
