//! In-process memory store.
//!
//! A [`CacheStore`] over a `tokio::sync::RwLock`-guarded map with lazy
//! per-entry expiry: an entry past its deadline is dropped the next time it
//! is looked up. Hit/miss/expiry counters are tracked the same way whether
//! the lookup came from the read-through layer or directly from a caller.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock as StdRwLock;
use std::time::Duration;
use tokio::sync::RwLock;

use async_trait::async_trait;
use recall_core::RecallResult;

use crate::envelope::ResultEnvelope;
use crate::store::{CacheStats, CacheStore};

#[derive(Debug, Clone)]
struct StoredEntry {
    envelope: ResultEnvelope,
    expires_at: Option<DateTime<Utc>>,
}

impl StoredEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

/// In-process cache store.
///
/// With no default TTL configured, entries stored with `Duration::ZERO`
/// never expire - matching the "no expiry override" meaning of a zero TTL
/// in the store contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
    stats: StdRwLock<CacheStats>,
    default_ttl: Option<Duration>,
}

impl MemoryStore {
    /// Create a store whose default is "entries never expire".
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store applying `default_ttl` to zero-TTL writes.
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: StdRwLock::new(CacheStats::default()),
            default_ttl: Some(default_ttl),
        }
    }

    /// Number of entries currently held, including not-yet-pruned expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Snapshot of usage statistics.
    pub async fn stats(&self) -> CacheStats {
        let mut stats = self
            .stats
            .read()
            .map(|s| (*s).clone())
            .unwrap_or_default();
        stats.entry_count = self.entries.read().await.len() as u64;
        stats
    }

    fn record_hit(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.hits += 1;
        }
    }

    fn record_miss(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.misses += 1;
        }
    }

    fn record_expiration(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.expirations += 1;
        }
    }

    fn deadline_for(&self, ttl: Duration) -> Option<DateTime<Utc>> {
        let effective = if ttl.is_zero() {
            self.default_ttl?
        } else {
            ttl
        };
        chrono::Duration::from_std(effective)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta))
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> RecallResult<Option<ResultEnvelope>> {
        let mut entries = self.entries.write().await;

        let expired = entries.get(key).is_some_and(StoredEntry::is_expired);
        if expired {
            entries.remove(key);
            self.record_expiration();
            self.record_miss();
            return Ok(None);
        }

        match entries.get(key) {
            Some(entry) => {
                self.record_hit();
                Ok(Some(entry.envelope.clone()))
            }
            None => {
                self.record_miss();
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, envelope: ResultEnvelope, ttl: Duration) -> RecallResult<()> {
        let entry = StoredEntry {
            envelope,
            expires_at: self.deadline_for(ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> RecallResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> RecallResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
