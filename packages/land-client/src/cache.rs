//! File-backed TTL cache for listing API responses.
//!
//! One JSON file per key. The key is the hex MD5 of the canonical
//! (sorted-key) JSON serialization of the request parameters, so
//! semantically equal parameter sets share an entry regardless of insertion
//! order. Expired and unreadable entries are evicted lazily on read, and
//! every I/O failure degrades to a cache miss.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    cached_at: DateTime<Utc>,
    params: Value,
    payload: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// Per-entry view for the `cache status` CLI.
#[derive(Debug, Clone)]
pub struct CacheEntryInfo {
    pub region: String,
    pub kind: String,
    pub items: usize,
    pub cached_at: DateTime<Utc>,
    /// Negative once expired.
    pub expires_in: Duration,
    pub expired: bool,
    pub size_bytes: u64,
}

pub struct ResponseCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, ttl })
    }

    /// Canonical cache key for a parameter set. `serde_json` maps keep keys
    /// sorted, so serialization order is independent of insertion order.
    pub fn cache_key(params: &Value) -> String {
        let canonical = serde_json::to_string(params).unwrap_or_default();
        format!("{:x}", md5::compute(canonical.as_bytes()))
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
        // An entry exactly at the TTL boundary is still a hit.
        Utc::now() - cached_at <= self.ttl
    }

    /// Fetch the cached payload for `params`, or `None` on miss.
    ///
    /// Expired or corrupt entries are deleted on the way out.
    pub fn get(&self, params: &Value) -> Option<Value> {
        let key = Self::cache_key(params);
        let path = self.entry_path(&key);
        if !path.exists() {
            return None;
        }

        let entry = match read_entry(&path) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "unreadable cache entry, evicting");
                let _ = fs::remove_file(&path);
                return None;
            }
        };

        if !self.is_fresh(entry.cached_at) {
            tracing::debug!(key = %key, "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }

        tracing::info!(key = %key, "cache hit");
        Some(entry.payload)
    }

    /// Store `payload` under the key derived from `params`. Failures are
    /// logged and swallowed; the cache never fails a request.
    pub fn set(&self, params: &Value, payload: Value) {
        let key = Self::cache_key(params);
        let entry = CacheEntry {
            cached_at: Utc::now(),
            params: params.clone(),
            payload,
        };
        let path = self.entry_path(&key);
        match serde_json::to_vec_pretty(&entry) {
            Ok(bytes) => {
                if let Err(err) = fs::write(&path, bytes) {
                    tracing::warn!(key = %key, error = %err, "cache write failed");
                } else {
                    tracing::debug!(key = %key, "cache entry saved");
                }
            }
            Err(err) => tracing::warn!(key = %key, error = %err, "cache serialize failed"),
        }
    }

    /// Delete every entry. Returns the number removed.
    pub fn clear(&self) -> usize {
        let mut count = 0;
        for path in self.entry_files() {
            if fs::remove_file(&path).is_ok() {
                count += 1;
            }
        }
        tracing::info!(count, "cache cleared");
        count
    }

    /// Delete expired entries; unreadable files count as expired.
    pub fn clear_expired(&self) -> usize {
        let mut count = 0;
        for path in self.entry_files() {
            let stale = match read_entry(&path) {
                Ok(entry) => !self.is_fresh(entry.cached_at),
                Err(_) => true,
            };
            if stale && fs::remove_file(&path).is_ok() {
                count += 1;
            }
        }
        tracing::info!(count, "expired cache entries cleared");
        count
    }

    /// Delete entries whose `region` param starts with `region`.
    pub fn clear_by_region(&self, region: &str) -> usize {
        let mut count = 0;
        for path in self.entry_files() {
            let matches = read_entry(&path)
                .ok()
                .and_then(|entry| {
                    entry
                        .params
                        .get("region")
                        .and_then(Value::as_str)
                        .map(|r| r.starts_with(region))
                })
                .unwrap_or(false);
            if matches && fs::remove_file(&path).is_ok() {
                count += 1;
            }
        }
        tracing::info!(region = %region, count, "region cache entries cleared");
        count
    }

    pub fn stats(&self) -> CacheStats {
        let mut entries = 0;
        let mut total_bytes = 0;
        for path in self.entry_files() {
            entries += 1;
            if let Ok(meta) = fs::metadata(&path) {
                total_bytes += meta.len();
            }
        }
        CacheStats {
            entries,
            total_bytes,
        }
    }

    /// Per-entry listing sorted soonest-to-expire first.
    pub fn detailed_stats(&self) -> Vec<CacheEntryInfo> {
        let mut infos: Vec<CacheEntryInfo> = Vec::new();
        for path in self.entry_files() {
            let Ok(entry) = read_entry(&path) else {
                continue;
            };
            let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            let expires_in = entry.cached_at + self.ttl - Utc::now();
            let items = match &entry.payload {
                Value::Array(list) => list.len(),
                _ => 0,
            };
            let param_str = |name: &str| {
                entry
                    .params
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string()
            };
            infos.push(CacheEntryInfo {
                region: param_str("region"),
                kind: param_str("type"),
                items,
                cached_at: entry.cached_at,
                expires_in,
                expired: expires_in < Duration::zero(),
                size_bytes,
            });
        }
        infos.sort_by_key(|info| info.expires_in);
        infos
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        let Ok(dir) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        dir.filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect()
    }
}

fn read_entry(path: &Path) -> std::result::Result<CacheEntry, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cache(ttl: Duration) -> (tempfile::TempDir, ResponseCache) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), ttl).unwrap();
        (dir, cache)
    }

    #[test]
    fn key_is_insertion_order_independent() {
        let a = json!({"region": "11470", "type": "전세"});
        let mut map = serde_json::Map::new();
        map.insert("type".into(), json!("전세"));
        map.insert("region".into(), json!("11470"));
        let b = Value::Object(map);
        assert_eq!(ResponseCache::cache_key(&a), ResponseCache::cache_key(&b));
    }

    #[test]
    fn set_then_get_roundtrips() {
        let (_dir, cache) = cache(Duration::hours(24));
        let params = json!({"region": "11470", "type": "전세"});
        cache.set(&params, json!([{"id": "naver_1"}]));
        let hit = cache.get(&params).unwrap();
        assert_eq!(hit[0]["id"], "naver_1");
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let (_dir, cache) = cache(Duration::zero() - Duration::seconds(1));
        let params = json!({"region": "11470"});
        cache.set(&params, json!([1, 2, 3]));
        assert!(cache.get(&params).is_none());
        // the miss also removed the file
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn ttl_boundary_is_inclusive() {
        let ttl = Duration::minutes(10);
        let (dir, cache) = cache(ttl);
        let params = json!({"region": "11470"});
        let key = ResponseCache::cache_key(&params);
        let backdate = |cached_at: DateTime<Utc>| {
            let entry = CacheEntry {
                cached_at,
                params: params.clone(),
                payload: json!([1]),
            };
            fs::write(
                dir.path().join(format!("{key}.json")),
                serde_json::to_vec(&entry).unwrap(),
            )
            .unwrap();
        };

        // just inside the window
        backdate(Utc::now() - ttl + Duration::seconds(5));
        assert!(cache.get(&params).is_some());

        // just past it
        backdate(Utc::now() - ttl - Duration::seconds(5));
        assert!(cache.get(&params).is_none());
    }

    #[test]
    fn corrupt_entry_degrades_to_miss() {
        let (dir, cache) = cache(Duration::hours(1));
        let params = json!({"region": "11470"});
        cache.set(&params, json!([1]));
        let key = ResponseCache::cache_key(&params);
        std::fs::write(dir.path().join(format!("{key}.json")), b"not json").unwrap();
        assert!(cache.get(&params).is_none());
    }

    #[test]
    fn clear_by_region_is_prefix_scoped() {
        let (_dir, cache) = cache(Duration::hours(1));
        cache.set(&json!({"region": "11470", "type": "전세"}), json!([]));
        cache.set(&json!({"region": "11500", "type": "전세"}), json!([]));
        cache.set(&json!({"region": "41135", "type": "전세"}), json!([]));
        assert_eq!(cache.clear_by_region("11"), 2);
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn clear_expired_keeps_fresh_entries() {
        let (_dir, cache) = cache(Duration::hours(1));
        cache.set(&json!({"region": "a"}), json!([]));
        assert_eq!(cache.clear_expired(), 0);
        assert_eq!(cache.stats().entries, 1);
        assert_eq!(cache.clear(), 1);
    }
}
