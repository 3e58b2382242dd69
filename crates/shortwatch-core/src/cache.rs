//! In-memory memoization of acquisition cycles.
//!
//! The pipeline is a pure function of its declared inputs; this store layers
//! caching on top of it without leaking into pipeline logic. Entries are
//! keyed by a config fingerprint and expire on a TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cache behavior for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    /// Serve a non-expired entry if present, otherwise compute and store.
    #[default]
    Use,
    /// Always recompute and overwrite the stored entry.
    Refresh,
    /// Always recompute; neither read nor write the store.
    Bypass,
}

#[derive(Debug, Clone)]
struct Entry {
    payload: String,
    expires_at: Instant,
}

#[derive(Debug)]
struct Store {
    entries: HashMap<String, Entry>,
    ttl: Duration,
}

/// Thread-safe TTL cache for serialized cycle results.
#[derive(Debug, Clone)]
pub struct CacheStore {
    inner: Arc<tokio::sync::RwLock<Store>>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(Store {
                entries: HashMap::new(),
                ttl,
            })),
        }
    }

    /// Default five-minute TTL, matching how fast short-interest data moves.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// A store that never retains anything.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        let store = self.inner.read().await;
        store.entries.get(key).and_then(|entry| {
            if Instant::now() <= entry.expires_at {
                Some(entry.payload.clone())
            } else {
                None
            }
        })
    }

    pub async fn put(&self, key: String, payload: String) {
        let mut store = self.inner.write().await;
        if store.ttl == Duration::ZERO {
            return;
        }
        let expires_at = Instant::now() + store.ttl;
        store.entries.insert(key, Entry { payload, expires_at });
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.entries.clear();
    }

    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
