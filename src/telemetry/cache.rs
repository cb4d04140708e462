use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Configuration for HTTP response caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(7 * 24 * 3600),
        }
    }
}

/// Get the platform-appropriate cache directory for podium-pick
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("podium-pick/http-cache"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/podium-pick/http-cache",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the HTTP cache directory
pub fn clear_cache() -> Result<()> {
    let cache_path = get_cache_path();
    match std::fs::remove_dir_all(&cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Serializable cache entry: response body plus when it was fetched
#[derive(Serialize, Deserialize)]
struct CachedBody {
    fetched_at: u64, // Unix timestamp
    body: String,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Disk-persistent response cache keyed by request URL.
///
/// Entries older than the configured TTL are treated as misses and get
/// overwritten by the next successful fetch.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    cache_path: PathBuf,
    config: CacheConfig,
}

impl ResponseCache {
    pub fn new(cache_path: PathBuf, config: CacheConfig) -> Self {
        Self { cache_path, config }
    }

    /// Short status for log lines
    pub fn status(&self) -> &'static str {
        if self.config.enabled {
            "enabled"
        } else {
            "disabled"
        }
    }

    /// Return the cached body for `key` if present and still fresh
    pub fn read(&self, key: &str) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        let bytes = cacache::read_sync(&self.cache_path, key).ok()?;
        let entry: CachedBody = serde_json::from_slice(&bytes).ok()?;

        let age = now_secs().saturating_sub(entry.fetched_at);
        if age >= self.config.ttl.as_secs() {
            debug!(key, age, "Cache entry expired");
            return None;
        }

        debug!(key, "Cache hit");
        Some(entry.body)
    }

    /// Store `body` under `key`, stamped with the current time.
    ///
    /// Empty JSON lists are not stored: a session that has not run yet
    /// returns `[]` and must be refetched once it has.
    pub fn write(&self, key: &str, body: &str) -> Result<()> {
        if !self.config.enabled {
            return Ok(());
        }
        if body.trim() == "[]" {
            debug!(key, "Empty response not cached");
            return Ok(());
        }

        let entry = CachedBody {
            fetched_at: now_secs(),
            body: body.to_string(),
        };
        let json = serde_json::to_vec(&entry)?;
        cacache::write_sync(&self.cache_path, key, &json)
            .with_context(|| format!("Failed to write cache entry for {}", key))?;
        Ok(())
    }
}
