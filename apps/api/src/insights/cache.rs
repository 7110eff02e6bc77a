//! Insight Cache: remembers the last insight per scope together with the day it
//! was produced and the fingerprint of the check-ins it was produced from.
//!
//! Each scope persists three string slots:
//!   `<prefix>:<scope>:insight`          JSON-encoded [`Insight`]
//!   `<prefix>:<scope>:last_fetch_date`  `YYYY-MM-DD`
//!   `<prefix>:<scope>:source_hash`      decimal fingerprint
//!
//! Store failures are never surfaced: a failed read is a miss, a failed write is
//! logged and dropped. Concurrent writers for one scope resolve last-write-wins.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::insights::fingerprint::{fingerprint, Fingerprint};
use crate::insights::models::Insight;
use crate::models::checkin::CheckIn;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persisted slots per scope, in read order.
const SLOTS: [&str; 3] = ["insight", "last_fetch_date", "source_hash"];

// ────────────────────────────────────────────────────────────────────────────
// Storage backends
// ────────────────────────────────────────────────────────────────────────────

/// String key/value storage behind the cache. Swap implementations without
/// touching the cache or its callers.
#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Reads several keys at once, in order. Backends with a batch read override this.
    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut values = Vec::with_capacity(keys.len());
        for key in keys {
            values.push(self.get(key).await?);
        }
        Ok(values)
    }
}

/// Process-local store. Used when no Redis is configured, and in tests.
#[derive(Default)]
pub struct MemoryInsightStore {
    slots: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl InsightStore for MemoryInsightStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Redis-backed store shared across API instances. Holds one managed connection
/// that reconnects on its own; clones of it share the underlying socket.
pub struct RedisInsightStore {
    conn: ConnectionManager,
}

impl RedisInsightStore {
    pub async fn connect(client: redis::Client) -> Result<Self> {
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl InsightStore for RedisInsightStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    async fn get_many(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let mut conn = self.conn.clone();
        let mut mget = redis::cmd("MGET");
        for key in keys {
            mget.arg(key);
        }
        let values: Vec<Option<String>> = mget.query_async(&mut conn).await?;
        Ok(values)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cache entries and scopes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheScope {
    Team,
    Person(String),
}

impl fmt::Display for CacheScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheScope::Team => f.write_str("team"),
            CacheScope::Person(name) => write!(f, "person:{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub insight: Insight,
    pub last_fetch_date: String,
    pub source_hash: String,
}

/// Decides whether a fresh insight request is warranted.
///
/// Returns false only when the stored date is `today` AND the stored hash equals
/// the fingerprint of `current_records`.
pub fn should_fetch_new_insights(
    current_records: &[CheckIn],
    last_fetch_date: Option<&str>,
    previous_hash: Option<&str>,
    today: NaiveDate,
) -> bool {
    match fingerprint(current_records) {
        Ok(current) => should_refetch(current, last_fetch_date, previous_hash, today),
        Err(e) => {
            warn!("Could not fingerprint check-ins, forcing refetch: {e}");
            true
        }
    }
}

/// Same decision as [`should_fetch_new_insights`] for callers that already hold
/// the fingerprint of the current records.
pub fn should_refetch(
    current: Fingerprint,
    last_fetch_date: Option<&str>,
    previous_hash: Option<&str>,
    today: NaiveDate,
) -> bool {
    if last_fetch_date != Some(today.format(DATE_FORMAT).to_string().as_str()) {
        return true;
    }
    !previous_hash.is_some_and(|hash| current.matches(hash))
}

// ────────────────────────────────────────────────────────────────────────────
// Cache
// ────────────────────────────────────────────────────────────────────────────

/// Insight cache over an injected [`InsightStore`]. Cheap to clone.
#[derive(Clone)]
pub struct InsightCache {
    store: Arc<dyn InsightStore>,
    prefix: String,
}

impl InsightCache {
    pub fn new(store: Arc<dyn InsightStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn key(&self, scope: &CacheScope, slot: &str) -> String {
        format!("{}:{}:{}", self.prefix, scope, slot)
    }

    /// Returns the last stored entry for `scope`, or `None` if it was never
    /// populated, was cleared, is incomplete, or could not be read.
    pub async fn load(&self, scope: &CacheScope) -> Option<CacheEntry> {
        let keys = SLOTS.map(|slot| self.key(scope, slot));
        let values = match self.store.get_many(&keys).await {
            Ok(values) => values,
            Err(e) => {
                warn!("Insight cache read failed for {scope}: {e:#}");
                return None;
            }
        };
        let values: [Option<String>; 3] = values.try_into().ok()?;
        let [Some(raw_insight), Some(last_fetch_date), Some(source_hash)] = values else {
            return None;
        };

        match serde_json::from_str::<Insight>(&raw_insight) {
            Ok(insight) => Some(CacheEntry {
                insight,
                last_fetch_date,
                source_hash,
            }),
            Err(e) => {
                warn!("Discarding unreadable cached insight for {scope}: {e}");
                None
            }
        }
    }

    /// Overwrites the entry for `scope` with `insight`, `today` and `source_hash`.
    pub async fn store(
        &self,
        scope: &CacheScope,
        insight: &Insight,
        source_hash: Fingerprint,
        today: NaiveDate,
    ) {
        let encoded = match serde_json::to_string(insight) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Could not encode insight for {scope}, skipping cache write: {e}");
                return;
            }
        };

        let values = [
            encoded,
            today.format(DATE_FORMAT).to_string(),
            source_hash.to_string(),
        ];
        for (slot, value) in SLOTS.into_iter().zip(values) {
            if let Err(e) = self.store.set(&self.key(scope, slot), &value).await {
                warn!("Insight cache write failed for {scope}/{slot}: {e:#}");
                return;
            }
        }
        debug!("Cached insight for {scope} (hash {source_hash})");
    }

}

/// Store whose every call fails, standing in for an unreachable Redis.
#[cfg(test)]
pub(crate) struct BrokenStore;

#[cfg(test)]
#[async_trait]
impl InsightStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        anyhow::bail!("connection refused")
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        anyhow::bail!("connection refused")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::checkin::sample_check_in;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 21).unwrap()
    }

    fn records() -> Vec<CheckIn> {
        vec![sample_check_in(1, "happy", 2, 9), sample_check_in(2, "sad", 8, 3)]
    }

    fn memory_cache() -> InsightCache {
        InsightCache::new(Arc::new(MemoryInsightStore::default()), "test")
    }

    #[test]
    fn test_should_fetch_without_previous_date() {
        let hash = fingerprint(&records()).unwrap().to_string();
        assert!(should_fetch_new_insights(&records(), None, Some(hash.as_str()), today()));
    }

    #[test]
    fn test_should_fetch_when_date_is_yesterday_even_if_hash_matches() {
        let hash = fingerprint(&records()).unwrap().to_string();
        assert!(should_fetch_new_insights(
            &records(),
            Some("2024-03-20"),
            Some(hash.as_str()),
            today()
        ));
    }

    #[test]
    fn test_no_fetch_when_date_and_hash_match() {
        let hash = fingerprint(&records()).unwrap().to_string();
        assert!(!should_fetch_new_insights(
            &records(),
            Some("2024-03-21"),
            Some(hash.as_str()),
            today()
        ));
    }

    #[test]
    fn test_should_fetch_when_hash_differs_or_missing() {
        assert!(should_fetch_new_insights(
            &records(),
            Some("2024-03-21"),
            Some("42"),
            today()
        ));
        assert!(should_fetch_new_insights(
            &records(),
            Some("2024-03-21"),
            None,
            today()
        ));
    }

    #[tokio::test]
    async fn test_load_empty_cache_is_none() {
        assert!(memory_cache().load(&CacheScope::Team).await.is_none());
    }

    #[tokio::test]
    async fn test_store_then_load_round_trips_slots() {
        let cache = memory_cache();
        let hash = fingerprint(&records()).unwrap();
        cache
            .store(&CacheScope::Team, &Insight::fallback(), hash, today())
            .await;

        let entry = cache.load(&CacheScope::Team).await.unwrap();
        assert_eq!(entry.insight, Insight::fallback());
        assert_eq!(entry.last_fetch_date, "2024-03-21");
        assert_eq!(entry.source_hash, hash.to_string());
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let cache = memory_cache();
        let hash = fingerprint(&records()).unwrap();
        cache
            .store(
                &CacheScope::Person("alex".to_string()),
                &Insight::fallback(),
                hash,
                today(),
            )
            .await;

        assert!(cache.load(&CacheScope::Team).await.is_none());
        assert!(cache
            .load(&CacheScope::Person("alex".to_string()))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_corrupt_insight_slot_is_a_miss() {
        let store = Arc::new(MemoryInsightStore::default());
        store.set("test:team:insight", "{not json").await.unwrap();
        store.set("test:team:last_fetch_date", "2024-03-21").await.unwrap();
        store.set("test:team:source_hash", "1").await.unwrap();

        let cache = InsightCache::new(store, "test");
        assert!(cache.load(&CacheScope::Team).await.is_none());
    }

    #[tokio::test]
    async fn test_broken_store_degrades_to_miss() {
        let cache = InsightCache::new(Arc::new(BrokenStore), "test");
        let hash = fingerprint(&records()).unwrap();
        cache
            .store(&CacheScope::Team, &Insight::fallback(), hash, today())
            .await;
        assert!(cache.load(&CacheScope::Team).await.is_none());
    }

    #[test]
    fn test_should_refetch_with_precomputed_fingerprint() {
        let current = fingerprint(&records()).unwrap();
        let hash = current.to_string();
        assert!(!should_refetch(current, Some("2024-03-21"), Some(hash.as_str()), today()));
        assert!(should_refetch(current, Some("2024-03-20"), Some(hash.as_str()), today()));
        assert!(should_refetch(current, None, Some(hash.as_str()), today()));
    }

    #[tokio::test]
    async fn test_partially_written_entry_is_a_miss() {
        let store = Arc::new(MemoryInsightStore::default());
        store.set("test:team:insight", r#"{"summary": "ok"}"#).await.unwrap();
        store.set("test:team:last_fetch_date", "2024-03-21").await.unwrap();

        let cache = InsightCache::new(store, "test");
        assert!(cache.load(&CacheScope::Team).await.is_none());
    }

    #[tokio::test]
    async fn test_get_many_defaults_to_ordered_gets() {
        let store = MemoryInsightStore::default();
        store.set("a", "1").await.unwrap();
        store.set("c", "3").await.unwrap();
        let keys = ["a", "b", "c"].map(String::from);
        assert_eq!(
            store.get_many(&keys).await.unwrap(),
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[test]
    fn test_scope_key_format() {
        let cache = memory_cache();
        assert_eq!(
            cache.key(&CacheScope::Person("sam".to_string()), "source_hash"),
            "test:person:sam:source_hash"
        );
    }
}
