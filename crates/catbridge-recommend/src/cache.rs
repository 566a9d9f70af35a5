//! Time-bounded result cache consulted by the orchestrator.
//!
//! The cache is owned by the caller and handed to the orchestrator; there is
//! no process-wide instance. Entries expire by time only.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use catbridge_core::ScoringConfig;

use crate::types::RecommendationResult;

/// `"{id}:{config fingerprint}"`, so a changed bundle never hits stale entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    #[must_use]
    pub fn new(id: &str, config: &ScoringConfig) -> Self {
        Self::from_parts(id, &config.fingerprint())
    }

    #[must_use]
    pub fn from_parts(id: &str, fingerprint: &str) -> Self {
        Self(format!("{id}:{fingerprint}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait RecommendationCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<RecommendationResult>;

    fn put(&self, key: CacheKey, value: RecommendationResult, ttl: Duration);
}

struct Entry {
    value: RecommendationResult,
    expires_at: Instant,
}

/// In-memory [`RecommendationCache`] guarded by a mutex.
#[derive(Default)]
pub struct TtlCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl TtlCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }
}

impl RecommendationCache for TtlCache {
    fn get(&self, key: &CacheKey) -> Option<RecommendationResult> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = entries.get(key)?.expires_at <= Instant::now();
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn put(&self, key: CacheKey, value: RecommendationResult, ttl: Duration) {
        let Some(expires_at) = Instant::now().checked_add(ttl) else {
            tracing::warn!(key = %key, ?ttl, "cache ttl overflows the clock; entry not stored");
            return;
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Entry { value, expires_at });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Diagnostics, RecommendationStatus};

    fn result(id: &str) -> RecommendationResult {
        RecommendationResult {
            id: id.to_string(),
            status: RecommendationStatus::Success,
            recommendations: Vec::new(),
            diagnostics: Diagnostics::empty(),
            error: None,
            from_cache: false,
        }
    }

    #[test]
    fn stored_entry_is_returned_before_expiry() {
        let cache = TtlCache::new();
        let key = CacheKey::from_parts("a1", "f00");
        cache.put(key.clone(), result("a1"), Duration::from_secs(60));
        assert_eq!(cache.get(&key).map(|r| r.id), Some("a1".to_string()));
    }

    #[test]
    fn zero_ttl_entry_is_expired_on_read() {
        let cache = TtlCache::new();
        let key = CacheKey::from_parts("a1", "f00");
        cache.put(key.clone(), result("a1"), Duration::ZERO);
        assert!(cache.get(&key).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let cache = TtlCache::new();
        cache.put(CacheKey::from_parts("a1", "f"), result("a1"), Duration::ZERO);
        cache.put(CacheKey::from_parts("a2", "f"), result("a2"), Duration::from_secs(60));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn key_changes_with_config() {
        let default = ScoringConfig::default();
        let strict = catbridge_core::ScoringPreset::Strict.config();
        assert_ne!(CacheKey::new("a1", &default), CacheKey::new("a1", &strict));
        assert_eq!(CacheKey::new("a1", &default), CacheKey::new("a1", &default));
        assert!(CacheKey::new("a1", &default).as_str().starts_with("a1:"));
    }
}
