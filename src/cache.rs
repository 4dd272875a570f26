//! Filesystem-backed detection cache
//!
//! One file per entry; the filename is a human-readable sanitized prefix
//! plus a SHA-256 of the full key so distinct keys can never collide. Each
//! file holds `{data, timestamp, ttl_secs}` as JSON. Entries are lazily
//! invalidated on read and can be proactively swept. All reads and writes
//! are fire-and-forget: a cache failure must never fail the surrounding
//! detection.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Time-to-live applied to detection results.
pub const DETECTION_TTL: Duration = Duration::from_secs(30 * 60);

const PREFIX_MAX_LEN: usize = 40;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: serde_json::Value,
    timestamp: DateTime<Utc>,
    ttl_secs: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        age.num_seconds() >= self.ttl_secs as i64
    }
}

/// Explicit cache object owned by its orchestrator; created at startup,
/// directory ensured lazily on first write, never torn down mid-process.
#[derive(Debug, Clone)]
pub struct DetectionCache {
    dir: PathBuf,
}

impl DetectionCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Platform cache directory, falling back to the system temp dir.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("repoprobe")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetch a live entry. Expired entries are deleted on access.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = std::fs::read_to_string(&path).ok()?;
        let entry: CacheEntry = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Corrupt cache entry, removing");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };

        if entry.is_expired(Utc::now()) {
            debug!(key, "Cache entry expired");
            let _ = std::fs::remove_file(&path);
            return None;
        }

        serde_json::from_value(entry.data).ok()
    }

    /// Store a value. Failures are logged and swallowed.
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) {
        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Failed to serialize cache entry");
                return;
            }
        };
        let entry = CacheEntry {
            data,
            timestamp: Utc::now(),
            ttl_secs: ttl.as_secs(),
        };

        if let Err(err) = std::fs::create_dir_all(&self.dir) {
            warn!(dir = %self.dir.display(), error = %err, "Failed to create cache dir");
            return;
        }

        let path = self.entry_path(key);
        match serde_json::to_string(&entry) {
            Ok(serialized) => {
                if let Err(err) = std::fs::write(&path, serialized) {
                    warn!(file = %path.display(), error = %err, "Failed to write cache entry");
                }
            }
            Err(err) => warn!(key, error = %err, "Failed to serialize cache entry"),
        }
    }

    /// Remove every expired entry, returning how many were deleted.
    pub fn sweep(&self) -> usize {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return 0;
        };
        let now = Utc::now();
        let mut removed = 0;

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let expired = std::fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str::<CacheEntry>(&content).ok())
                .map(|e| e.is_expired(now))
                // Unreadable entries are garbage either way.
                .unwrap_or(true);
            if expired && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        debug!(removed, "Cache sweep completed");
        removed
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        let hash = hex::encode(digest);

        let prefix: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .take(PREFIX_MAX_LEN)
            .collect();

        self.dir.join(format!("{}-{}.json", prefix, hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn cache() -> (TempDir, DetectionCache) {
        let dir = TempDir::new().unwrap();
        let cache = DetectionCache::new(dir.path().join("cache"));
        (dir, cache)
    }

    #[test]
    fn test_round_trip_before_ttl() {
        let (_dir, cache) = cache();
        let data = json!({"language": "python", "confidence": 0.9});

        cache.set("python:/repo:{}", &data, Duration::from_secs(60));
        let loaded: Option<serde_json::Value> = cache.get("python:/repo:{}");
        assert_eq!(loaded, Some(data));
    }

    #[test]
    fn test_absent_after_ttl_elapsed() {
        let (_dir, cache) = cache();
        cache.set("key", &json!("value"), Duration::from_secs(0));

        let loaded: Option<serde_json::Value> = cache.get("key");
        assert!(loaded.is_none());
        // Lazy invalidation removed the file itself.
        let files: Vec<_> = std::fs::read_dir(cache.dir())
            .map(|d| d.flatten().collect())
            .unwrap_or_default();
        assert!(files.is_empty());
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let (_dir, cache) = cache();
        let loaded: Option<serde_json::Value> = cache.get("never-written");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let (_dir, cache) = cache();
        // Same sanitized prefix, different raw keys.
        cache.set("python:/a/b:x", &json!(1), Duration::from_secs(60));
        cache.set("python:/a_b:x", &json!(2), Duration::from_secs(60));

        assert_eq!(cache.get::<serde_json::Value>("python:/a/b:x"), Some(json!(1)));
        assert_eq!(cache.get::<serde_json::Value>("python:/a_b:x"), Some(json!(2)));
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let (_dir, cache) = cache();
        cache.set("live", &json!(1), Duration::from_secs(3600));
        cache.set("dead-1", &json!(2), Duration::from_secs(0));
        cache.set("dead-2", &json!(3), Duration::from_secs(0));

        let removed = cache.sweep();
        assert_eq!(removed, 2);
        assert_eq!(cache.get::<serde_json::Value>("live"), Some(json!(1)));
    }

    #[test]
    fn test_corrupt_entry_is_removed_on_read() {
        let (_dir, cache) = cache();
        cache.set("key", &json!(1), Duration::from_secs(60));

        // Overwrite the entry file with garbage.
        let entries: Vec<_> = std::fs::read_dir(cache.dir()).unwrap().flatten().collect();
        std::fs::write(entries[0].path(), "not json").unwrap();

        let loaded: Option<serde_json::Value> = cache.get("key");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_set_never_panics_on_bad_dir() {
        let cache = DetectionCache::new(PathBuf::from("/proc/definitely/not/writable"));
        cache.set("key", &json!(1), Duration::from_secs(60));
        let loaded: Option<serde_json::Value> = cache.get("key");
        assert!(loaded.is_none());
    }
}
