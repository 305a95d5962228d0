//! Process-wide session cache
//!
//! Remote session details are expensive to fetch (one in-page vendor
//! command per lookup) and stable for the life of a browser session, so
//! they are cached per browser guid. The cache is an explicitly
//! constructed object injected into whoever needs it; [`SessionCache::shared`]
//! hands out the process-wide instance so separate clients still compute
//! each browser's details once.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

static SHARED: Lazy<Arc<SessionCache>> = Lazy::new(|| Arc::new(SessionCache::new()));

/// Concurrent string-keyed cache
///
/// Concurrent readers and writers are safe; colliding writes are
/// last-writer-wins. Entries are never evicted.
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: DashMap<String, Value>,
}

impl SessionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache instance, initialized on first use
    pub fn shared() -> Arc<SessionCache> {
        SHARED.clone()
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Insert or replace a value
    pub fn insert<K: Into<String>>(&self, key: K, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Remove all entries
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
