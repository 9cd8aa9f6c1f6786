//! Tiered TTL cache
//!
//! In-process key/value store with a fixed per-instance time-to-live. The
//! records proxy composes two independently configured instances: a "short"
//! tier for volatile records (grades may be corrected upstream) and a "long"
//! tier for near-static media (profile photos, institution logos).
//!
//! Expiry is lazy: an expired entry is removed and treated as absent the
//! next time it is read. There is no explicit invalidation API - staleness
//! is bounded purely by the TTL. Concurrent `set` calls for the same key are
//! last-write-wins.
//!
//! Callers are responsible for embedding the credential digest in every key
//! so entries can never leak across sessions.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// One TTL tier
///
/// Cheap to share behind an `Arc`; `get`/`set` take the internal lock for
/// the duration of a map operation only, so request handlers never block on
/// anything slower than a memory access.
pub struct TieredCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TieredCache<V> {
    /// Create a cache tier with a fixed TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a key, treating expired entries as absent
    ///
    /// An expired entry is purged on the way out so the map does not
    /// accumulate dead entries for keys that keep being read.
    pub fn get(&self, key: &str) -> Option<V> {
        {
            let entries = self.entries.read().expect("cache lock poisoned");
            match entries.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => {} // expired, purge below
                None => return None,
            }
        }

        let mut entries = self.entries.write().expect("cache lock poisoned");
        if let Some(entry) = entries.get(key) {
            if entry.expires_at <= Instant::now() {
                entries.remove(key);
            } else {
                // Another writer refreshed the entry between the locks
                return Some(entry.value.clone());
            }
        }
        None
    }

    /// Store a value with the tier's TTL, overwriting any existing entry
    pub fn set(&self, key: &str, value: V) {
        let mut entries = self.entries.write().expect("cache lock poisoned");
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Number of entries currently stored (expired entries included until
    /// their next read)
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ========================================
// Tests
// ========================================
