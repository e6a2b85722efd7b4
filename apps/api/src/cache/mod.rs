//! TTL cache in front of every stage that talks to an upstream source.
//!
//! Entries carry their own `created_at` and `ttl_seconds`, so validity is
//! decided here rather than by whatever expiry the backend offers.

pub mod memory;
pub mod redis_store;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// Stage namespaces used as key prefixes.
pub mod ns {
    pub const ROLE_MAP: &str = "role_map";
    pub const SKILLS: &str = "skills";
    pub const FORECAST: &str = "forecast";
    pub const RESOURCES: &str = "resources";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

impl CacheEntry {
    /// Valid iff `now - created_at <= ttl_seconds`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.created_at);
        i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .map_or(true, |ttl| age <= ttl)
    }
}

/// Lower-cases and collapses whitespace so equivalent queries share a cache line.
pub fn normalize_query(query: &str) -> String {
    query
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builds `namespace:normalized-part[:normalized-part...]`.
pub fn cache_key(namespace: &str, parts: &[&str]) -> String {
    let mut key = namespace.to_string();
    for part in parts {
        key.push(':');
        key.push_str(&normalize_query(part));
    }
    key
}

/// Storage backend for cache entries. Writes replace the whole entry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheError>;
    async fn store(&self, entry: CacheEntry) -> Result<(), CacheError>;
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
    async fn clear(&self) -> Result<(), CacheError>;
    fn backend_name(&self) -> &'static str;
}

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Typed get/set over a [`CacheStore`]. Never fails a caller: backend errors
/// are logged and treated as a miss or a skipped write.
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn CacheStore>,
    clock: Clock,
}

impl TtlCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self::with_clock(store, Arc::new(Utc::now))
    }

    pub fn with_clock(store: Arc<dyn CacheStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = match self.store.load(key).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };

        if !entry.is_valid_at((self.clock)()) {
            debug!(key, "cache entry expired");
            if let Err(e) = self.store.remove(key).await {
                warn!(key, error = %e, "failed to evict expired cache entry");
            }
            return None;
        }

        match serde_json::from_value(entry.payload) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "cached payload no longer matches its type");
                None
            }
        }
    }

    /// Overwrites any previous value and restarts its age. A zero TTL stores nothing.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) {
        if ttl_seconds == 0 {
            return;
        }
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "failed to serialize cache payload");
                return;
            }
        };
        let entry = CacheEntry {
            key: key.to_string(),
            payload,
            created_at: (self.clock)(),
            ttl_seconds,
        };
        if let Err(e) = self.store.store(entry).await {
            warn!(key, error = %e, "cache write failed, skipping");
        }
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::Mutex;

    fn manual_clock(start: DateTime<Utc>) -> (Arc<Mutex<DateTime<Utc>>>, Clock) {
        let now = Arc::new(Mutex::new(start));
        let handle = now.clone();
        let clock: Clock = Arc::new(move || *handle.lock().unwrap());
        (now, clock)
    }

    struct FailingStore;

    #[async_trait]
    impl CacheStore for FailingStore {
        async fn load(&self, _key: &str) -> Result<Option<CacheEntry>, CacheError> {
            Err(CacheError::Backend("down".into()))
        }
        async fn store(&self, _entry: CacheEntry) -> Result<(), CacheError> {
            Err(CacheError::Backend("down".into()))
        }
        async fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Backend("down".into()))
        }
        async fn clear(&self) -> Result<(), CacheError> {
            Err(CacheError::Backend("down".into()))
        }
        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    #[test]
    fn test_normalize_query_collapses_case_and_whitespace() {
        assert_eq!(normalize_query("  Data   Scientist "), "data scientist");
        assert_eq!(
            cache_key(ns::RESOURCES, &["Machine  Learning", "Junior"]),
            "resources:machine learning:junior"
        );
    }

    #[test]
    fn test_entry_validity_is_inclusive_at_ttl() {
        let created = Utc::now();
        let entry = CacheEntry {
            key: "k".into(),
            payload: Value::Null,
            created_at: created,
            ttl_seconds: 60,
        };
        assert!(entry.is_valid_at(created + Duration::seconds(60)));
        assert!(!entry.is_valid_at(created + Duration::seconds(61)));
    }

    #[test]
    fn test_entry_expires_within_the_second_after_ttl() {
        let created = Utc::now();
        let entry = CacheEntry {
            key: "k".into(),
            payload: Value::Null,
            created_at: created,
            ttl_seconds: 60,
        };
        assert!(!entry.is_valid_at(created + Duration::milliseconds(60_001)));
        assert!(!entry.is_valid_at(created + Duration::milliseconds(60_900)));
    }

    #[tokio::test]
    async fn test_round_trip_within_ttl_then_expired() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let store = Arc::new(MemoryStore::default());
        let cache = TtlCache::with_clock(store.clone(), clock);

        cache.set("skills:data scientist", &vec!["Python", "SQL"], 3600).await;

        *now.lock().unwrap() = start + Duration::seconds(10);
        let hit: Option<Vec<String>> = cache.get("skills:data scientist").await;
        assert_eq!(hit, Some(vec!["Python".to_string(), "SQL".to_string()]));

        *now.lock().unwrap() = start + Duration::seconds(3601);
        let miss: Option<Vec<String>> = cache.get("skills:data scientist").await;
        assert_eq!(miss, None);
        assert!(store.load("skills:data scientist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites_and_resets_age() {
        let start = Utc::now();
        let (now, clock) = manual_clock(start);
        let cache = TtlCache::with_clock(Arc::new(MemoryStore::default()), clock);

        cache.set("forecast:15-2051", &1_u32, 100).await;
        *now.lock().unwrap() = start + Duration::seconds(90);
        cache.set("forecast:15-2051", &2_u32, 100).await;
        *now.lock().unwrap() = start + Duration::seconds(150);

        assert_eq!(cache.get::<u32>("forecast:15-2051").await, Some(2));
    }

    #[tokio::test]
    async fn test_zero_ttl_is_not_stored() {
        let cache = TtlCache::in_memory();
        cache.set("k", &"v", 0).await;
        assert_eq!(cache.get::<String>("k").await, None);
    }

    #[tokio::test]
    async fn test_backend_failure_is_a_miss() {
        let cache = TtlCache::new(Arc::new(FailingStore));
        cache.set("k", &"v", 60).await;
        assert_eq!(cache.get::<String>("k").await, None);
        assert!(cache.clear().await.is_err());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_a_miss() {
        let cache = TtlCache::in_memory();
        cache.set("k", &"not a number", 60).await;
        assert_eq!(cache.get::<u32>("k").await, None);
    }
}
