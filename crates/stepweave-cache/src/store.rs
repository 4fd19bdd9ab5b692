//! In-memory TTL store.
//!
//! One store is constructed at process start and shared by reference
//! (`Arc<CacheStore<_>>`) with every caller. All operations take the same
//! mutex, so each is atomic with respect to concurrent callers.
//!
//! Expired entries are evicted lazily when read. [`CacheStore::cleanup_expired`]
//! sweeps the rest and can be scheduled with [`spawn_sweeper`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

// Lifetime given to entries whose TTL overflows `Instant`.
const MAX_ENTRY_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// `tokio::time::interval` rejects a zero period.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// A stored value with its lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Point-in-time snapshot of store occupancy.
///
/// Expired entries stay resident until they are read or swept, so they are
/// counted in `total_entries`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
}

/// Thread-safe key/value store with per-entry TTL.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use stepweave_cache::CacheStore;
///
/// let cache = CacheStore::new();
/// cache.set("weather:paris", 21, Duration::from_secs(60));
///
/// assert_eq!(cache.get("weather:paris"), Some(21));
/// assert!(cache.invalidate("weather:paris"));
/// assert_eq!(cache.get("weather:paris"), None);
/// ```
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    // Every operation leaves the map consistent before it can panic, so a
    // poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key` for `ttl`, replacing any existing entry.
    ///
    /// A TTL too large to add to the current instant, such as
    /// `Duration::MAX`, is clamped to one hundred years.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + MAX_ENTRY_TTL);
        let entry = CacheEntry {
            value,
            created_at: now,
            expires_at,
        };
        self.lock().insert(key.into(), entry);
    }

    /// Remove `key`. Returns whether it was present.
    pub fn invalidate(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut entries = self.lock();
        let count = entries.len();
        entries.clear();
        count
    }

    /// Remove every entry whose TTL has elapsed. Returns how many were removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.lock();
        let total_entries = entries.len();
        let active_entries = entries.values().filter(|e| e.is_live(now)).count();
        CacheStats {
            total_entries,
            active_entries,
            expired_entries: total_entries - active_entries,
        }
    }

    /// Number of resident entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Whether `key` holds an unexpired entry. Does not evict.
    pub fn contains_live(&self, key: &str) -> bool {
        let now = Instant::now();
        self.lock().get(key).is_some_and(|entry| entry.is_live(now))
    }
}

impl<V: Clone> CacheStore<V> {
    /// Look up `key`, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Look up the full entry for `key` without evicting.
    pub fn entry(&self, key: &str) -> Option<CacheEntry<V>> {
        self.lock().get(key).cloned()
    }
}

/// Periodically sweep expired entries from `store` on the current runtime.
///
/// The task runs until aborted. Lazy eviction alone keeps reads correct; the
/// sweeper only bounds memory under sustained load. Intervals below one
/// millisecond, including zero, are raised to one millisecond.
pub fn spawn_sweeper<V>(store: Arc<CacheStore<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(MIN_SWEEP_INTERVAL));
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.cleanup_expired();
            if removed > 0 {
                debug!(removed, "Swept expired cache entries");
            }
        }
    })
}
