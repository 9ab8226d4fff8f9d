//! Resilient HTTP access layer
//!
//! Composes a content-addressed response cache, minimum request spacing and a
//! retry policy with a stale-cache fallback tier into a single
//! [`HttpSession::request`](http::HttpSession::request) operation.

use std::path::PathBuf;
use std::time::Duration;

pub mod cache;
pub mod http;
pub mod rate_limit;

pub use cache::CacheStore;
pub use http::HttpSession;
pub use rate_limit::RateLimiter;

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session token could be resolved. Fatal; re-login is a manual,
    /// out-of-band action (the upstream login form is captcha-protected).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The upstream redirected to its login page: the session token is stale.
    /// Fatal and non-retryable; retrying with the same credential cannot help.
    #[error("session token expired: the upstream redirected to its login page, retrieve a fresh SESSION cookie")]
    AuthenticationExpired,

    /// All live attempts failed and no fallback cache entry was usable.
    #[error("{method} {path} failed after {attempts} attempt(s): {source}")]
    RequestExhausted {
        /// HTTP method of the failed request
        method: String,
        /// Request path
        path: String,
        /// Number of attempts made (initial request plus retries)
        attempts: u32,
        /// Last error observed before giving up
        source: Box<SessionError>,
    },

    /// Transport failure or unexpected response status
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not parse as the expected JSON shape
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response cache could not be written
    #[error("cache error: {0}")]
    Cache(#[from] std::io::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Behavioral configuration for one [`HttpSession`].
///
/// Two distinct staleness tiers are deliberate: `cache_lifetime` governs
/// opportunistic freshness (skip the network entirely), while
/// `fallback_cache_lifetime` governs degraded-mode availability (serve a stale
/// entry only once live retries are exhausted).
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Explicit session token; takes precedence over environment and file
    pub session_token: Option<String>,
    /// Age bound for the opportunistic cache tier; `None` disables it
    pub cache_lifetime: Option<Duration>,
    /// Age bound for the degraded-mode fallback tier; `None` disables it
    pub fallback_cache_lifetime: Option<Duration>,
    /// Directory backing the response cache; `None` disables caching entirely
    pub cache_path: Option<PathBuf>,
    /// Minimum spacing between request completions; `None`/zero disables pacing
    pub delay_between_requests: Option<Duration>,
    /// Number of retries after the initial attempt
    pub max_retries: u32,
    /// Extra sleep between retries, on top of the request pacing
    pub delay_between_retries: Option<Duration>,
}
