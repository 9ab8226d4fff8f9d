//! Content-addressed, time-bounded cache of raw response bodies
//!
//! Each entry is one opaque file under the cache directory, named by a digest
//! of `(method, path, payload)`. Presence and mtime are the entire on-disk
//! contract; there is no index file. Writes replace the whole entry.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Local response cache shared by one session's sequential request loop.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: Option<PathBuf>,
    write_enabled: bool,
}

impl CacheStore {
    /// Create a cache store.
    ///
    /// `write_enabled` reflects whether any staleness tier is configured;
    /// without one, [`put`](Self::put) is a no-op so no entries accumulate
    /// that nothing would ever read.
    pub fn new(dir: Option<PathBuf>, write_enabled: bool) -> Self {
        Self { dir, write_enabled }
    }

    /// Stable cache key for a request shape.
    pub fn cache_key(method: &str, path: &str, body: Option<&Value>) -> String {
        let identity = serde_json::json!([method, path, body]);
        let mut hasher = Sha256::new();
        hasher.update(identity.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn entry_path(&self, method: &str, path: &str, body: Option<&Value>) -> Option<PathBuf> {
        self.dir
            .as_ref()
            .map(|dir| dir.join(Self::cache_key(method, path, body)))
    }

    /// Look up the cached body for a request, bounded by `max_age`.
    ///
    /// Returns `None` when caching is disabled, no entry exists, the age bound
    /// is unset, or the entry is older than `max_age`. IO problems are treated
    /// as a miss; the caller falls through to the network.
    pub fn get(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        max_age: Option<Duration>,
    ) -> Option<Vec<u8>> {
        let max_age = max_age?;
        let file = self.entry_path(method, path, body)?;
        let age = entry_age(&file)?;
        if age > max_age {
            debug!(entry = %file.display(), ?age, "cache entry too old");
            return None;
        }
        fs::read(&file).ok()
    }

    /// Store the raw response body for a request, replacing any prior entry.
    ///
    /// Creates the backing directory on first write. No-op when caching is
    /// disabled for the session.
    pub fn put(
        &self,
        method: &str,
        path: &str,
        body: Option<&Value>,
        response_body: &[u8],
    ) -> io::Result<()> {
        if !self.write_enabled {
            return Ok(());
        }
        let Some(file) = self.entry_path(method, path, body) else {
            return Ok(());
        };
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, response_body)?;
        debug!(entry = %file.display(), bytes = response_body.len(), "cached response body");
        Ok(())
    }
}

fn entry_age(file: &Path) -> Option<Duration> {
    let modified = fs::metadata(file).ok()?.modified().ok()?;
    // A clock step backwards makes the entry look brand new, which only
    // costs an extra cache hit.
    Some(
        SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO),
    )
}
