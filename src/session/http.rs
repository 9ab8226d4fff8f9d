//! Session-cookie-authenticated HTTP client with caching, pacing and retries
//!
//! One request shape: JSON bodies to one upstream, authenticated by a SESSION
//! cookie the operator obtained out-of-band. Retry and cache keys are
//! deliberately hard-coded to that shape; this is not a general HTTP client.

use once_cell::sync::{Lazy, OnceCell};
use reqwest::header::{ACCEPT, CONTENT_TYPE, COOKIE, LOCATION, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::api::ApiConfig;
use crate::session::{CacheStore, RateLimiter, SessionConfig, SessionError, SessionResult};

/// HTTP connect timeout - time to establish the TCP connection
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP request timeout - overall time for one attempt
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT_VALUE: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client. Redirects stay disabled so the redirect-to-login
/// signal is observable instead of being followed.
static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            panic!("FATAL: failed to build HTTP client: {e}. Check system TLS configuration.")
        })
});

/// Resilient session over the upstream scheduling API.
///
/// `request` resolves in this order: fresh cache entry, live request with
/// pacing and retries, stale fallback cache entry. See [`SessionConfig`] for
/// the two staleness tiers.
pub struct HttpSession {
    client: Client,
    api: ApiConfig,
    config: SessionConfig,
    cache: CacheStore,
    limiter: RateLimiter,
    token: OnceCell<String>,
}

impl HttpSession {
    /// Create a session against the given upstream.
    pub fn new(api: ApiConfig, config: SessionConfig) -> Self {
        let cache = CacheStore::new(
            config.cache_path.clone(),
            config.cache_lifetime.is_some() || config.fallback_cache_lifetime.is_some(),
        );
        let limiter = RateLimiter::new(config.delay_between_requests);
        Self {
            client: SHARED_CLIENT.clone(),
            api,
            config,
            cache,
            limiter,
            token: OnceCell::new(),
        }
    }

    /// Upstream configuration this session targets.
    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    /// GET a path, returning the parsed JSON body.
    pub async fn get(&self, path: &str) -> SessionResult<Value> {
        self.request(Method::GET, path, None).await
    }

    /// POST a JSON body to a path, returning the parsed JSON body.
    pub async fn post(&self, path: &str, body: Option<&Value>) -> SessionResult<Value> {
        self.request(Method::POST, path, body).await
    }

    /// Issue one API request with caching, pacing, retries and fallback.
    ///
    /// A fresh cache hit returns immediately with no network call, no pacing
    /// wait and no retry accounting. Otherwise live attempts run, spaced by
    /// the rate limiter, until one succeeds or `max_retries` is exhausted;
    /// only then is the stale fallback tier consulted.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> SessionResult<Value> {
        debug!(%method, path, "API request");

        if let Some(raw) = self
            .cache
            .get(method.as_str(), path, body, self.config.cache_lifetime)
        {
            debug!(path, "serving fresh cache entry");
            return Ok(serde_json::from_slice(&raw)?);
        }

        let token = self.resolve_token()?;
        let url = format!("{}{}", self.api.base_url, path);
        let mut attempts: u32 = 0;
        let last_error = loop {
            attempts += 1;
            self.limiter.pace().await;
            let outcome = self.attempt(&method, path, &url, body, token).await;
            self.limiter.mark();

            match outcome {
                Ok(value) => return Ok(value),
                Err(e @ SessionError::AuthenticationExpired) => return Err(e),
                Err(e) => {
                    warn!(
                        attempt = attempts,
                        of = self.config.max_retries + 1,
                        error = %e,
                        path,
                        "request attempt failed"
                    );
                    if attempts <= self.config.max_retries {
                        if let Some(delay) = self.config.delay_between_retries {
                            sleep(delay).await;
                        }
                        continue;
                    }
                    break e;
                }
            }
        };

        // Degraded mode: a stale-but-usable entry beats no answer at all,
        // but only once live attempts are exhausted.
        if let Some(raw) = self.cache.get(
            method.as_str(),
            path,
            body,
            self.config.fallback_cache_lifetime,
        ) {
            warn!(path, attempts, "serving stale fallback cache entry");
            return Ok(serde_json::from_slice(&raw)?);
        }

        Err(SessionError::RequestExhausted {
            method: method.to_string(),
            path: path.to_string(),
            attempts,
            source: Box::new(last_error),
        })
    }

    async fn attempt(
        &self,
        method: &Method,
        path: &str,
        url: &str,
        body: Option<&Value>,
        token: &str,
    ) -> SessionResult<Value> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(COOKIE, format!("SESSION={token}"));
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SessionError::Http(format!("request failed: {e}")))?;

        if let Some(location) = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
        {
            if location == self.api.login_url {
                return Err(SessionError::AuthenticationExpired);
            }
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SessionError::Http(format!("failed to read response body: {e}")))?;

        if status != StatusCode::OK {
            return Err(SessionError::Http(format!(
                "unexpected status {status} for {method} {path}"
            )));
        }

        let value: Value = serde_json::from_str(&text)?;
        self.cache.put(method.as_str(), path, body, text.as_bytes())?;
        Ok(value)
    }

    /// Resolve the session token once per process: explicit configuration,
    /// then environment, then a token file under the cache path.
    fn resolve_token(&self) -> SessionResult<&str> {
        self.token
            .get_or_try_init(|| {
                if let Some(token) = &self.config.session_token {
                    return Ok(token.clone());
                }
                if let Ok(token) = std::env::var(&self.api.token_env) {
                    if !token.is_empty() {
                        return Ok(token);
                    }
                }
                if let Some(cache_path) = &self.config.cache_path {
                    let file = cache_path.join(&self.api.token_file);
                    if file.exists() {
                        let token = std::fs::read_to_string(&file)
                            .map_err(SessionError::Cache)?
                            .trim()
                            .to_string();
                        return Ok(token);
                    }
                }
                Err(SessionError::Configuration(format!(
                    "no valid session token found.\n\
                     1. Go to {}\n\
                     2. Log in\n\
                     3. Copy the value of the cookie called 'SESSION'\n\
                     4. Run: export {}=VALUE_OF_THE_SESSION_COOKIE\n\
                     5. Run this command again",
                    self.api.base_url, self.api.token_env
                )))
            })
            .map(String::as_str)
    }
}
